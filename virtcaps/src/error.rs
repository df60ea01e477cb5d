//! Error types for capability parsing and queries.

use core::fmt;
use thiserror::Error;

/// Classification of errors for callers that branch on the kind of failure.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    /// A named entity is absent from the document.
    NotFound,
    /// The host cannot satisfy the requested guest configuration.
    Unsupported,
    /// The document text could not be read as a capability document.
    Document,
    /// The capability source failed to produce a document.
    Source,
}

impl fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ErrorKind::NotFound => write!(f, "NotFound"),
            ErrorKind::Unsupported => write!(f, "Unsupported"),
            ErrorKind::Document => write!(f, "Document"),
            ErrorKind::Source => write!(f, "Source"),
        }
    }
}

/// Capability layer errors with typed context.
#[derive(Error, Debug)]
pub enum Error {
    /// A structurally required child (for example an enum) is not defined.
    #[error("{kind} '{name}' not found in capabilities document")]
    NotFound { kind: &'static str, name: String },

    /// The requested guest OS type is not offered by the host.
    #[error("Host does not support virtualization type '{virt_type}'{}{}",
        requested_suffix(.virt_type, .requested),
        arch_suffix(.arch.as_deref()))]
    UnsupportedVirtType {
        virt_type: String,
        requested: String,
        arch: Option<String>,
    },

    /// No guest of any OS type runs on the requested architecture.
    #[error("Host does not support any virtualization options for architecture '{arch}'")]
    UnsupportedArch { arch: String },

    /// The guest exists but not with the requested domain type or machine.
    #[error("Host does not support domain type '{domain_type}'{} for virtualization type '{virt_type}' with architecture '{arch}'",
        machine_suffix(.machine.as_deref()))]
    UnsupportedDomainType {
        domain_type: String,
        machine: Option<String>,
        virt_type: String,
        arch: String,
    },

    /// The host advertises no guest capabilities at all.
    #[error("Host does not support any virtualization options: it supports no guest types")]
    NoGuestCapability,

    /// The document text is not well-formed XML.
    #[error("Malformed capabilities document: {0}")]
    Document(#[from] roxmltree::Error),

    /// The document parsed but is not the expected flavor.
    #[error("Expected <{expected}> document root, found <{found}>")]
    UnexpectedRoot {
        expected: &'static str,
        found: String,
    },

    /// The capability source could not produce a document.
    #[error("Failed to fetch {what}: {message}")]
    Source { what: &'static str, message: String },
}

fn requested_suffix(virt_type: &str, requested: &str) -> String {
    if virt_type == requested {
        String::new()
    } else {
        format!(" (requested as '{requested}')")
    }
}

fn arch_suffix(arch: Option<&str>) -> String {
    arch.map(|a| format!(" for architecture '{a}'"))
        .unwrap_or_default()
}

fn machine_suffix(machine: Option<&str>) -> String {
    machine
        .map(|m| format!(" with machine '{m}'"))
        .unwrap_or_default()
}

impl Error {
    /// Get the kind classification for this error.
    pub fn kind(&self) -> ErrorKind {
        match self {
            Error::NotFound { .. } => ErrorKind::NotFound,
            Error::UnsupportedVirtType { .. }
            | Error::UnsupportedArch { .. }
            | Error::UnsupportedDomainType { .. }
            | Error::NoGuestCapability => ErrorKind::Unsupported,
            Error::Document(_) | Error::UnexpectedRoot { .. } => ErrorKind::Document,
            Error::Source { .. } => ErrorKind::Source,
        }
    }

    /// Check if this is a lookup miss on a named entity.
    pub fn is_not_found(&self) -> bool {
        self.kind() == ErrorKind::NotFound
    }

    /// Check if the host cannot satisfy a guest request.
    pub fn is_unsupported(&self) -> bool {
        self.kind() == ErrorKind::Unsupported
    }

    /// Create a not-found error.
    pub fn not_found(kind: &'static str, name: impl Into<String>) -> Self {
        Error::NotFound {
            kind,
            name: name.into(),
        }
    }

    /// Create a source failure error.
    pub fn source_failed(what: &'static str, message: impl Into<String>) -> Self {
        Error::Source {
            what,
            message: message.into(),
        }
    }
}

/// Result type for capability operations.
pub type Result<T> = core::result::Result<T, Error>;
