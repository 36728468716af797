use std::{
    fs::File,
    io::Read,
    path::{Path, PathBuf},
    rc::Rc,
};

/// `Source` represents some literal source code.
/// Whether a file on disk or an inline test snippet,
/// it's essentially a string with a path, the path
/// serving as the source's name. Sources built from a
/// bare string point to `./source`.
#[derive(Debug, PartialEq, Eq)]
pub struct Source {
    pub contents: String,
    pub path: PathBuf,
}

impl Source {
    /// Creates a new `Source` from both an `&str` and a `PathBuf`.
    /// Note that this function does not check that the contents of
    /// the file match the source; use `Source::path` or
    /// `Source::source` instead.
    pub fn new(source: &str, path: &Path) -> Rc<Source> {
        Rc::new(Source {
            contents: source.to_string(),
            path: path.to_owned(),
        })
    }

    /// Builds a `Source` by reading a file from disk.
    pub fn path(path: &Path) -> std::io::Result<Rc<Source>> {
        let mut source = String::new();
        let mut file = File::open(path)?;
        file.read_to_string(&mut source)?;

        Ok(Source::new(&source, path))
    }

    /// Builds a `Source` containing just a string,
    /// pointing towards `./source`.
    pub fn source(source: &str) -> Rc<Source> {
        Source::new(source, &PathBuf::from("./source"))
    }
}
