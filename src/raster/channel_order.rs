//! Interleaved channel layouts.
//!
//! Color components are always stored contiguously within a pixel; layouts
//! only differ in where that run starts, whether it is red- or blue-first,
//! and whether an alpha or padding element sits next to it.

/// A named channel of an interleaved pixel.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ChannelKind {
    Red,
    Green,
    Blue,
    Alpha,
}

/// Element order within one pixel. `X` marks an unused padding element.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum ChannelOrder {
    #[default]
    Rgba,
    Bgra,
    Argb,
    Abgr,
    Rgbx,
    Bgrx,
    Xrgb,
    Xbgr,
    Rgb,
    Bgr,
    /// Single luminance channel.
    Gray,
}

impl ChannelOrder {
    /// Default order for a surface with or without alpha.
    pub fn for_alpha(alpha: bool) -> Self {
        if alpha {
            ChannelOrder::Rgba
        } else {
            ChannelOrder::Rgb
        }
    }

    /// Elements per pixel, padding included.
    pub fn pixel_stride(&self) -> usize {
        match self {
            ChannelOrder::Rgb | ChannelOrder::Bgr => 3,
            ChannelOrder::Gray => 1,
            _ => 4,
        }
    }

    pub fn red_offset(&self) -> usize {
        match self {
            ChannelOrder::Rgba | ChannelOrder::Rgbx | ChannelOrder::Rgb => 0,
            ChannelOrder::Bgra | ChannelOrder::Bgrx | ChannelOrder::Bgr => 2,
            ChannelOrder::Argb | ChannelOrder::Xrgb => 1,
            ChannelOrder::Abgr | ChannelOrder::Xbgr => 3,
            ChannelOrder::Gray => 0,
        }
    }

    pub fn green_offset(&self) -> usize {
        match self {
            ChannelOrder::Argb | ChannelOrder::Abgr | ChannelOrder::Xrgb | ChannelOrder::Xbgr => 2,
            ChannelOrder::Gray => 0,
            _ => 1,
        }
    }

    pub fn blue_offset(&self) -> usize {
        match self {
            ChannelOrder::Rgba | ChannelOrder::Rgbx | ChannelOrder::Rgb => 2,
            ChannelOrder::Bgra | ChannelOrder::Bgrx | ChannelOrder::Bgr => 0,
            ChannelOrder::Argb | ChannelOrder::Xrgb => 3,
            ChannelOrder::Abgr | ChannelOrder::Xbgr => 1,
            ChannelOrder::Gray => 0,
        }
    }

    pub fn alpha_offset(&self) -> Option<usize> {
        match self {
            ChannelOrder::Rgba | ChannelOrder::Bgra => Some(3),
            ChannelOrder::Argb | ChannelOrder::Abgr => Some(0),
            _ => None,
        }
    }

    pub fn has_alpha(&self) -> bool {
        self.alpha_offset().is_some()
    }

    /// Offset of the first color element, whichever of red or blue leads.
    pub fn color_offset(&self) -> usize {
        self.red_offset().min(self.blue_offset())
    }

    /// Number of channels a blur processes: 1 for gray, 4 with alpha, else 3.
    pub fn channel_count(&self) -> usize {
        match self {
            ChannelOrder::Gray => 1,
            order if order.has_alpha() => 4,
            _ => 3,
        }
    }

    pub fn offset_of(&self, kind: ChannelKind) -> Option<usize> {
        match kind {
            ChannelKind::Red => Some(self.red_offset()),
            ChannelKind::Green => Some(self.green_offset()),
            ChannelKind::Blue => Some(self.blue_offset()),
            ChannelKind::Alpha => self.alpha_offset(),
        }
    }
}
