/*
* Copyright (C) 2019-2024 EverX. All Rights Reserved.
*
* Licensed under the SOFTWARE EVALUATION License (the "License"); you may not use
* this file except in compliance with the License.
*
* Unless required by applicable law or agreed to in writing, software
* distributed under the License is distributed on an "AS IS" BASIS,
* WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
* See the License for the specific EVERX DEV software governing permissions and
* limitations under the License.
*/

pub type Error = failure::Error;
pub type Result<T> = std::result::Result<T, Error>;

#[macro_export]
macro_rules! error {
    ($error:literal) => {
        failure::err_msg(format!("{} {}:{}", $error, file!(), line!()))
    };
    ($error:expr) => {
        failure::Error::from($error)
    };
    ($fmt:expr, $($arg:tt)+) => {
        failure::err_msg(format!("{} {}:{}", format!($fmt, $($arg)*), file!(), line!()))
    };
}

#[macro_export]
macro_rules! fail {
    ($error:literal) => {
        return Err(failure::err_msg(format!("{} {}:{}", $error, file!(), line!())))
    };
    ($error:expr) => {
        return Err($crate::error!($error))
    };
    ($fmt:expr, $($arg:tt)*) => {
        return Err(failure::err_msg(format!("{} {}:{}", format!($fmt, $($arg)*), file!(), line!())))
    };
}

#[derive(Debug, failure::Fail, PartialEq, Eq)]
pub enum VaultError {
    /// Value does not fit into the declared bit width
    #[fail(display = "value {} does not fit into {} bits", value, bits)]
    FieldOverflow {
        value: String,
        bits: usize,
    },
    /// Builder exceeded 1023 data bits or 4 references
    #[fail(display = "cell overflow: {} bits and {} references requested", bits, refs)]
    CellOverflow {
        bits: usize,
        refs: usize,
    },
    /// Decoder tried to read more than the cell holds, or read an unexpected layout
    #[fail(display = "schema mismatch: {}", 0)]
    SchemaMismatch(String),
    #[fail(display = "unknown opcode `#{:08x}` for {}", op, contract)]
    UnknownOpcode {
        op: u32,
        contract: String,
    },
    #[fail(display = "wrong opcode `#{:08x}`, expected `#{:08x}` ({})", found, expected, name)]
    WrongOpcode {
        expected: u32,
        found: u32,
        name: &'static str,
    },
    #[fail(display = "address mismatch: derived {}, reported {}", derived, reported)]
    AddressMismatch {
        derived: String,
        reported: String,
    },
    #[fail(display = "{} upgrade is not ready: ready at {}, now {}", kind, ready_at, now)]
    UpgradeNotReady {
        kind: &'static str,
        ready_at: u64,
        now: u64,
    },
    #[fail(display = "no {} upgrade is pending", 0)]
    UpgradeNotPending(&'static str),
    #[fail(display = "Invalid argument: {}", 0)]
    InvalidArg(String),
    #[fail(display = "Invalid data: {}", 0)]
    InvalidData(String),
}

impl VaultError {
    pub fn schema(msg: impl Into<String>) -> Self {
        VaultError::SchemaMismatch(msg.into())
    }
}
