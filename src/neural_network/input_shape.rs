/// Passive description of the data fed into the first layer of a network.
///
/// Only the flattened size matters to the dense layers in this crate; the width/height/channel
/// form exists so image-like inputs can be described by their natural dimensions.
///
/// # Variants
///
/// - `Flat` - A plain feature vector of `size` values
/// - `Image` - A `width × height × channels` input flattened row-major into one feature vector
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum InputShape {
    Flat {
        size: usize,
    },
    Image {
        width: usize,
        height: usize,
        channels: usize,
    },
}

impl InputShape {
    /// Describes a flat feature vector.
    pub fn flat(size: usize) -> Self {
        InputShape::Flat { size }
    }

    /// Describes an image-like input.
    pub fn image(width: usize, height: usize, channels: usize) -> Self {
        InputShape::Image {
            width,
            height,
            channels,
        }
    }

    /// Returns the number of features the first layer receives.
    pub fn size(&self) -> usize {
        match *self {
            InputShape::Flat { size } => size,
            InputShape::Image {
                width,
                height,
                channels,
            } => width * height * channels,
        }
    }
}

impl std::fmt::Display for InputShape {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            InputShape::Flat { size } => write!(f, "(None, {})", size),
            InputShape::Image {
                width,
                height,
                channels,
            } => write!(f, "(None, {}x{}x{})", width, height, channels),
        }
    }
}
