use std::path::Path;
use std::process::Command;

use crate::error::Error;

/// Capability for handing a finished PDF to an external viewer/printer.
/// The hand-off is fire-and-forget: success means the launch succeeded,
/// nothing more.
pub trait Opener {
    fn open(&self, path: &Path) -> Result<(), Error>;
}

/// Opens the PDF with the OS default handler, from which the user prints.
pub struct SystemOpener;

impl Opener for SystemOpener {
    fn open(&self, path: &Path) -> Result<(), Error> {
        let mut cmd = if cfg!(target_os = "windows") {
            let mut c = Command::new("cmd");
            c.args(["/C", "start", ""]).arg(path);
            c
        } else if cfg!(target_os = "macos") {
            let mut c = Command::new("open");
            c.arg(path);
            c
        } else {
            let mut c = Command::new("xdg-open");
            c.arg(path);
            c
        };

        cmd.spawn()
            .map(|_| ())
            .map_err(|e| Error::Dispatch(e.to_string()))
    }
}

/// Hand an already-generated PDF to the viewer/printer flow. Refuses with
/// [`Error::ArtifactMissing`] when nothing has been generated yet; a failed
/// launch leaves the artifact untouched.
pub fn dispatch_artifact(opener: &dyn Opener, path: &Path) -> Result<(), Error> {
    if !path.exists() {
        return Err(Error::ArtifactMissing(path.to_path_buf()));
    }
    opener.open(path)?;
    log::info!("Handed {} to the system viewer", path.display());
    Ok(())
}
