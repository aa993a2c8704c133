use hog_core::{Image, ImageView};
use tracing::{debug, warn};

use crate::HostError;
use crate::config::HogConfig;
use crate::handle::DescriptorHandle;
use crate::value::{HostValue, Matrix, MatrixData};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Command {
    Construct,
    Compute,
    Destroy,
}

impl Command {
    pub fn parse(name: &str) -> Option<Self> {
        match name {
            "construct" => Some(Self::Construct),
            "compute" => Some(Self::Compute),
            "destroy" => Some(Self::Destroy),
            _ => None,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Self::Construct => "construct",
            Self::Compute => "compute",
            Self::Destroy => "destroy",
        }
    }
}

/// Owner of at most one descriptor instance.
///
/// The instance is created by `construct`, used by any number of `compute`
/// calls and released by `destroy`, by a later `construct`, or when the
/// session is dropped.
#[derive(Debug, Default)]
pub struct Session {
    instance: Option<DescriptorHandle>,
}

impl Session {
    pub fn new() -> Self {
        Self { instance: None }
    }

    pub fn is_constructed(&self) -> bool {
        self.instance.is_some()
    }

    pub fn instance(&self) -> Option<&DescriptorHandle> {
        self.instance.as_ref()
    }

    /// Installs a descriptor for `config`, releasing the previous one before
    /// the new one is allocated. Returns whether a previous instance was
    /// released.
    ///
    /// All checks run before anything is released, so a rejected config
    /// leaves the current instance in place.
    pub fn construct(&mut self, config: &HogConfig) -> Result<bool, HostError> {
        DescriptorHandle::check(config)?;
        let released = self.instance.take().is_some();
        if released {
            debug!("released previous descriptor");
        }
        self.instance = Some(DescriptorHandle::new(config)?);
        Ok(released)
    }

    pub fn compute(&mut self, img: &ImageView<'_, u8>) -> Result<Vec<f32>, HostError> {
        self.instance
            .as_mut()
            .ok_or(HostError::NotConstructed)?
            .compute(img)
    }

    /// Releases the instance if present. Returns whether one was released.
    pub fn destroy(&mut self) -> bool {
        self.instance.take().is_some()
    }

    /// Explicit end of the session's lifetime.
    pub fn close(mut self) {
        self.destroy();
    }

    /// Host entry point: `args[0]` names the command, `args[1]` is its
    /// argument. `nlhs` is the number of outputs the caller asks for.
    ///
    /// A first argument that is not a string, or a string that is not a known
    /// command, is ignored and produces no outputs.
    pub fn dispatch(
        &mut self,
        nlhs: usize,
        args: &[HostValue],
    ) -> Result<Vec<HostValue>, HostError> {
        if !(1..=2).contains(&args.len()) {
            return Err(HostError::InvalidArgumentCount { got: args.len() });
        }

        let Some(name) = args[0].as_str() else {
            warn!(kind = args[0].kind(), "ignoring call without a command string");
            return Ok(Vec::new());
        };
        let Some(command) = Command::parse(name) else {
            warn!(command = name, "ignoring unknown command");
            return Ok(Vec::new());
        };

        match command {
            Command::Construct => {
                let fields = args
                    .get(1)
                    .and_then(HostValue::as_record)
                    .ok_or_else(|| {
                        HostError::MissingConfiguration(
                            "construct expects a configuration record".into(),
                        )
                    })?;
                let config = HogConfig::from_record(fields)?;
                self.construct(&config)?;
                Ok(Vec::new())
            }
            Command::Compute => {
                if nlhs != 1 {
                    return Err(HostError::InvalidOutputCount { got: nlhs });
                }
                let (rows, cols, pixels) = image_argument(args.get(1))?;
                if !self.is_constructed() {
                    return Err(HostError::NotConstructed);
                }
                let image = Image::from_col_major(rows, cols, pixels)?;
                let features = self.compute(&image.as_view())?;
                Ok(vec![Matrix::row_vector_f32(features).into()])
            }
            Command::Destroy => {
                if self.destroy() {
                    debug!("descriptor destroyed");
                }
                Ok(Vec::new())
            }
        }
    }
}

/// Validates the compute image argument: a non-empty 2-D `uint8` matrix.
fn image_argument(arg: Option<&HostValue>) -> Result<(usize, usize, &[u8]), HostError> {
    let value = arg.ok_or(HostError::MissingImage)?;
    let matrix = value
        .as_matrix()
        .ok_or(HostError::InvalidImageShape { dims: Vec::new() })?;

    let dims = matrix.dims();
    if dims.len() != 2 {
        return Err(HostError::InvalidImageShape {
            dims: dims.to_vec(),
        });
    }
    let MatrixData::U8(pixels) = matrix.data() else {
        return Err(HostError::InvalidPixelType {
            class: matrix.class(),
        });
    };
    if dims[0] == 0 || dims[1] == 0 {
        return Err(HostError::InvalidImageShape {
            dims: dims.to_vec(),
        });
    }

    Ok((dims[0], dims[1], pixels))
}

#[cfg(test)]
mod tests {
    use super::{Command, Session};
    use crate::HostError;
    use crate::config::{BinOrder, HogConfig};

    fn small() -> HogConfig {
        HogConfig {
            window_size: [16, 16],
            cell_size: [8, 8],
            block_size: [2, 2],
            block_overlap: [1, 1],
            num_bins: 9,
            bin_order: BinOrder::Auto,
        }
    }

    #[test]
    fn command_names() {
        for cmd in [Command::Construct, Command::Compute, Command::Destroy] {
            assert_eq!(Command::parse(cmd.as_str()), Some(cmd));
        }
        assert_eq!(Command::parse("Construct"), None);
    }

    #[test]
    fn rejected_construct_keeps_current_instance() {
        let mut session = Session::new();
        session.construct(&small()).expect("valid config");

        let bad = HogConfig {
            window_size: [15, 16],
            ..small()
        };
        assert!(matches!(
            session.construct(&bad),
            Err(HostError::InvalidGeometry(_))
        ));
        let kept = session.instance().expect("instance kept");
        assert_eq!(kept.config(), &small());
    }

    #[test]
    fn construct_reports_replaced_instance() {
        let mut session = Session::new();
        assert!(!session.construct(&small()).expect("valid config"));
        assert!(session.construct(&small()).expect("valid config"));
        assert!(session.destroy());
        assert!(!session.destroy());
    }

    #[test]
    fn oversized_window_is_rejected_and_keeps_instance() {
        let mut session = Session::new();
        session.construct(&small()).expect("valid config");

        let huge = HogConfig {
            window_size: [2, usize::MAX / 2 + 1],
            cell_size: [1, 1],
            block_size: [1, 1],
            block_overlap: [1, 1],
            ..small()
        };
        assert!(matches!(
            session.construct(&huge),
            Err(HostError::InvalidGeometry(_))
        ));
        assert_eq!(session.instance().expect("instance kept").config(), &small());
    }

    #[test]
    fn destroy_reports_release_once() {
        let mut session = Session::new();
        assert!(!session.destroy());
        session.construct(&small()).expect("valid config");
        assert!(session.destroy());
        assert!(!session.destroy());
        assert!(!session.is_constructed());
    }
}
