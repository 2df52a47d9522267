// SPDX-License-Identifier: MIT
//
// fb-device — the display side of fbtools.
//
// Two layers. `Surface` is a bounds-checked pixel view over any byte
// region, validated once against a `PixelFormat` so that every in-range
// (row, column) maps to bytes that exist. `Framebuffer` is the Linux
// capability that produces such a region: it queries the device geometry
// through the fbdev ioctls and maps the video memory.
//
// Nothing outside `Surface` computes byte offsets into video memory.

#[cfg(unix)]
pub mod device;
pub mod error;
pub mod format;
pub mod surface;

#[cfg(unix)]
pub use device::{Framebuffer, MappedRegion, open_surface};
pub use error::{Error, Result};
pub use format::{Channel, Geometry, PixelFormat};
pub use surface::Surface;
