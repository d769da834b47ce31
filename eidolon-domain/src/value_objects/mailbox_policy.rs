// /////////////////////////////////////////////////////////////////////////////
// Optimized Adaptive Pipeline RS
// Copyright (c) 2025 Michael Gardner, A Bit of Help, Inc.
// SPDX-License-Identifier: BSD-3-Clause
// See LICENSE file in the project root.
// /////////////////////////////////////////////////////////////////////////////

//! # Mailbox Overflow Policy

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum MailboxPolicy {
    /// Publisher suspends until the mailbox has space. Default.
    Block,
    /// Evict the oldest queued envelope to make room for the new one.
    DropOldest,
    /// Discard the envelope being published.
    DropNew,
}

impl Default for MailboxPolicy {
    fn default() -> Self {
        MailboxPolicy::Block
    }
}

impl MailboxPolicy {
    pub fn as_str(&self) -> &'static str {
        match self {
            MailboxPolicy::Block => "block",
            MailboxPolicy::DropOldest => "drop-oldest",
            MailboxPolicy::DropNew => "drop-new",
        }
    }
}
