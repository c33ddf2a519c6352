//! The codegen → linking boundary (§6). Like [`crate::codegen`], this is a
//! trait boundary with no process-spawning implementation: this repository
//! never shells out to a linker.

use std::path::PathBuf;

/// The linkers the real collaborator would auto-detect among.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LinkerKind {
    LdLld,
    Ld64Lld,
    LldLink,
}

impl LinkerKind {
    /// The linker this repository would pick for the host platform, absent
    /// an actual linker invocation to consult. Grounded in the conventional
    /// per-OS default rather than detection of an installed toolchain.
    pub fn default_for_host() -> LinkerKind {
        if cfg!(target_os = "macos") {
            LinkerKind::Ld64Lld
        } else if cfg!(target_os = "windows") {
            LinkerKind::LldLink
        } else {
            LinkerKind::LdLld
        }
    }
}

/// What kind of artifact a link produces.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LinkOutputKind {
    Executable,
    SharedLibrary,
    StaticArchive,
}

/// The inputs a real linker invocation would need.
#[derive(Debug, Clone)]
pub struct LinkRequest {
    pub object_files: Vec<PathBuf>,
    pub output_path: PathBuf,
    pub output_kind: LinkOutputKind,
    pub linker: LinkerKind,
}

impl LinkRequest {
    pub fn new(object_files: Vec<PathBuf>, output_path: PathBuf, output_kind: LinkOutputKind) -> Self {
        LinkRequest { object_files, output_path, output_kind, linker: LinkerKind::default_for_host() }
    }

    pub fn with_linker(mut self, linker: LinkerKind) -> Self {
        self.linker = linker;
        self
    }
}

#[derive(Debug)]
pub enum LinkError {
    Unsupported(String),
}

impl std::fmt::Display for LinkError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            LinkError::Unsupported(what) => write!(f, "{what} is not implemented by this front-end-only build"),
        }
    }
}

impl std::error::Error for LinkError {}

/// What a real linking collaborator would implement. The testing harness
/// described in §6 additionally opens the produced shared library and
/// resolves named symbols for in-process invocation; that step belongs to
/// the harness, not this trait.
pub trait Linker {
    fn link(&mut self, request: &LinkRequest) -> Result<PathBuf, LinkError>;
}

#[derive(Debug, Default)]
pub struct UnimplementedLinker;

impl Linker for UnimplementedLinker {
    fn link(&mut self, _request: &LinkRequest) -> Result<PathBuf, LinkError> {
        Err(LinkError::Unsupported("linking".to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_linker_matches_host_os() {
        let linker = LinkerKind::default_for_host();
        if cfg!(target_os = "macos") {
            assert_eq!(linker, LinkerKind::Ld64Lld);
        } else if cfg!(target_os = "windows") {
            assert_eq!(linker, LinkerKind::LldLink);
        } else {
            assert_eq!(linker, LinkerKind::LdLld);
        }
    }

    #[test]
    fn unimplemented_linker_reports_linking_as_unsupported() {
        let request = LinkRequest::new(vec![PathBuf::from("a.o")], PathBuf::from("a.out"), LinkOutputKind::Executable);
        let mut linker = UnimplementedLinker;
        let err = linker.link(&request).unwrap_err();
        assert_eq!(err.to_string(), "linking is not implemented by this front-end-only build");
    }
}
