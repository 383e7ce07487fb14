use std::fs::OpenOptions;
use std::io::{self, Write};
use std::path::Path;

/// Permission bits for every output file.
pub const OUTPUT_FILE_MODE: u32 = 0o600;

/// Create or truncate `path` and write `contents` to it.
///
/// On unix a newly created file gets [`OUTPUT_FILE_MODE`]; an existing file
/// keeps its permissions.
pub fn write_owner_only(path: &Path, contents: &[u8]) -> io::Result<()> {
    let mut options = OpenOptions::new();
    options.write(true).create(true).truncate(true);
    #[cfg(unix)]
    {
        use std::os::unix::fs::OpenOptionsExt;
        options.mode(OUTPUT_FILE_MODE);
    }
    let mut file = options.open(path)?;
    file.write_all(contents)
}
