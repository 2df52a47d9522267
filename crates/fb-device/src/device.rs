// SPDX-License-Identifier: MIT
//
// Linux framebuffer device: geometry query and video memory mapping.
//
// Safety: This module uses `unsafe` for ioctl (FBIOGET_VSCREENINFO,
// FBIOGET_FSCREENINFO), mmap and munmap. The kernel structs are declared
// here as `repr(C)` mirrors of <linux/fb.h> because libc does not export
// them. Every pointer handed to the kernel points at a live, correctly
// sized value.
#![allow(unsafe_code)]
//
// `Framebuffer::open` reads both screen-info structs and turns them into a
// `Geometry`. `map` then maps `smem_len` bytes of video memory shared and
// writable. The resulting `MappedRegion` is a plain byte region: it unmaps
// itself on drop and knows nothing about pixels. `Surface` supplies the
// pixel view on top.

use std::fs::{File, OpenOptions};
use std::os::unix::io::AsRawFd;
use std::path::{Path, PathBuf};

use tracing::{debug, info};

use crate::error::{Error, Result};
use crate::format::{Channel, Geometry, PixelFormat};
use crate::surface::Surface;

// ─── Kernel ABI ─────────────────────────────────────────────────────────────

const FBIOGET_VSCREENINFO: libc::c_ulong = 0x4600;
const FBIOGET_FSCREENINFO: libc::c_ulong = 0x4602;

#[repr(C)]
#[derive(Debug, Clone, Copy, Default)]
struct FbBitfield {
    offset: u32,
    length: u32,
    msb_right: u32,
}

#[repr(C)]
#[derive(Debug, Clone, Copy, Default)]
struct FbVarScreeninfo {
    xres: u32,
    yres: u32,
    xres_virtual: u32,
    yres_virtual: u32,
    xoffset: u32,
    yoffset: u32,
    bits_per_pixel: u32,
    grayscale: u32,
    red: FbBitfield,
    green: FbBitfield,
    blue: FbBitfield,
    transp: FbBitfield,
    nonstd: u32,
    activate: u32,
    height: u32,
    width: u32,
    accel_flags: u32,
    pixclock: u32,
    left_margin: u32,
    right_margin: u32,
    upper_margin: u32,
    lower_margin: u32,
    hsync_len: u32,
    vsync_len: u32,
    sync: u32,
    vmode: u32,
    rotate: u32,
    colorspace: u32,
    reserved: [u32; 4],
}

#[repr(C)]
#[derive(Debug, Clone, Copy, Default)]
struct FbFixScreeninfo {
    id: [u8; 16],
    smem_start: libc::c_ulong,
    smem_len: u32,
    type_: u32,
    type_aux: u32,
    visual: u32,
    xpanstep: u16,
    ypanstep: u16,
    ywrapstep: u16,
    line_length: u32,
    mmio_start: libc::c_ulong,
    mmio_len: u32,
    accel: u32,
    capabilities: u16,
    reserved: [u16; 2],
}

impl FbFixScreeninfo {
    fn name(&self) -> String {
        let end = self.id.iter().position(|&b| b == 0).unwrap_or(self.id.len());
        String::from_utf8_lossy(&self.id[..end]).into_owned()
    }
}

const fn channel(bf: FbBitfield) -> Channel {
    Channel::new(bf.offset, bf.length)
}

/// Build a `Geometry` from the two kernel structs.
fn geometry_from(var: &FbVarScreeninfo, fix: &FbFixScreeninfo) -> Geometry {
    Geometry {
        width: var.xres,
        height: var.yres,
        format: PixelFormat {
            bits_per_pixel: var.bits_per_pixel,
            stride: fix.line_length as usize,
            red: channel(var.red),
            green: channel(var.green),
            blue: channel(var.blue),
            transp: channel(var.transp),
        },
    }
}

// ─── Framebuffer ────────────────────────────────────────────────────────────

/// An open framebuffer device with its queried geometry.
#[derive(Debug)]
pub struct Framebuffer {
    file: File,
    path: PathBuf,
    geometry: Geometry,
    mem_len: usize,
}

impl Framebuffer {
    /// Open `path` read-write and query its geometry.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Device`] if the device cannot be opened or either
    /// screen-info ioctl fails.
    pub fn open(path: &Path) -> Result<Self> {
        let file = OpenOptions::new()
            .read(true)
            .write(true)
            .open(path)
            .map_err(|e| Error::device("open framebuffer", e))?;
        let fd = file.as_raw_fd();

        let mut fix = FbFixScreeninfo::default();
        if unsafe { libc::ioctl(fd, FBIOGET_FSCREENINFO as _, &raw mut fix) } != 0 {
            return Err(Error::device(
                "FBIOGET_FSCREENINFO",
                std::io::Error::last_os_error(),
            ));
        }

        let mut var = FbVarScreeninfo::default();
        if unsafe { libc::ioctl(fd, FBIOGET_VSCREENINFO as _, &raw mut var) } != 0 {
            return Err(Error::device(
                "FBIOGET_VSCREENINFO",
                std::io::Error::last_os_error(),
            ));
        }

        let geometry = geometry_from(&var, &fix);
        info!(
            device = %path.display(),
            id = %fix.name(),
            width = geometry.width,
            height = geometry.height,
            bpp = var.bits_per_pixel,
            stride = fix.line_length,
            "opened framebuffer"
        );
        debug!(
            red = ?var.red,
            green = ?var.green,
            blue = ?var.blue,
            transp = ?var.transp,
            smem_len = fix.smem_len,
            "framebuffer layout"
        );

        Ok(Self {
            file,
            path: path.to_path_buf(),
            geometry,
            mem_len: fix.smem_len as usize,
        })
    }

    #[inline]
    #[must_use]
    pub const fn geometry(&self) -> &Geometry {
        &self.geometry
    }

    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Map the whole video memory shared and read-write.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Device`] if `mmap` fails or the device reports no
    /// video memory.
    pub fn map(&self) -> Result<MappedRegion> {
        if self.mem_len == 0 {
            return Err(Error::device(
                "mmap",
                std::io::Error::new(std::io::ErrorKind::InvalidData, "device reports no video memory"),
            ));
        }

        let ptr = unsafe {
            libc::mmap(
                std::ptr::null_mut(),
                self.mem_len,
                libc::PROT_READ | libc::PROT_WRITE,
                libc::MAP_SHARED,
                self.file.as_raw_fd(),
                0,
            )
        };
        if ptr == libc::MAP_FAILED {
            return Err(Error::device("mmap", std::io::Error::last_os_error()));
        }

        debug!(len = self.mem_len, "mapped video memory");
        Ok(MappedRegion {
            ptr: ptr.cast::<u8>(),
            len: self.mem_len,
        })
    }

    /// Map the device and wrap it as a validated [`Surface`].
    ///
    /// # Errors
    ///
    /// Propagates [`map`](Self::map) failures, and [`Error::UnsupportedFormat`]
    /// if the pixel layout is not byte addressable.
    pub fn into_surface(self) -> Result<Surface<MappedRegion>> {
        // Reject before mapping so an unusable layout costs nothing.
        self.geometry.format.validate()?;
        let region = self.map()?;
        Surface::new(region, self.geometry)
    }
}

/// Open the framebuffer at `path` and return a surface over its memory.
///
/// # Errors
///
/// See [`Framebuffer::open`] and [`Framebuffer::into_surface`].
pub fn open_surface(path: &Path) -> Result<Surface<MappedRegion>> {
    Framebuffer::open(path)?.into_surface()
}

// ─── MappedRegion ───────────────────────────────────────────────────────────

/// Shared, writable mapping of video memory. Unmapped on drop.
#[derive(Debug)]
pub struct MappedRegion {
    ptr: *mut u8,
    len: usize,
}

impl MappedRegion {
    #[inline]
    #[must_use]
    pub const fn len(&self) -> usize {
        self.len
    }

    #[inline]
    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.len == 0
    }
}

impl AsRef<[u8]> for MappedRegion {
    fn as_ref(&self) -> &[u8] {
        // `ptr` came from a successful mmap of `len` bytes that stays mapped
        // until drop.
        unsafe { std::slice::from_raw_parts(self.ptr, self.len) }
    }
}

impl AsMut<[u8]> for MappedRegion {
    fn as_mut(&mut self) -> &mut [u8] {
        unsafe { std::slice::from_raw_parts_mut(self.ptr, self.len) }
    }
}

impl Drop for MappedRegion {
    fn drop(&mut self) {
        let rc = unsafe { libc::munmap(self.ptr.cast::<libc::c_void>(), self.len) };
        if rc != 0 {
            tracing::warn!(error = %std::io::Error::last_os_error(), "munmap failed");
        } else {
            debug!(len = self.len, "unmapped video memory");
        }
    }
}

// ─── Tests ───────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn bf(offset: u32, length: u32) -> FbBitfield {
        FbBitfield {
            offset,
            length,
            msb_right: 0,
        }
    }

    #[test]
    fn kernel_struct_sizes() {
        assert_eq!(std::mem::size_of::<FbVarScreeninfo>(), 160);
        #[cfg(target_pointer_width = "64")]
        assert_eq!(std::mem::size_of::<FbFixScreeninfo>(), 80);
        #[cfg(target_pointer_width = "32")]
        assert_eq!(std::mem::size_of::<FbFixScreeninfo>(), 68);
    }

    #[test]
    fn geometry_from_kernel_structs() {
        let var = FbVarScreeninfo {
            xres: 1024,
            yres: 768,
            bits_per_pixel: 32,
            red: bf(16, 8),
            green: bf(8, 8),
            blue: bf(0, 8),
            transp: bf(24, 8),
            ..FbVarScreeninfo::default()
        };
        let fix = FbFixScreeninfo {
            line_length: 4096,
            ..FbFixScreeninfo::default()
        };
        let g = geometry_from(&var, &fix);
        assert_eq!(g.width, 1024);
        assert_eq!(g.height, 768);
        assert_eq!(g.format, PixelFormat::argb8888(4096));
    }

    #[test]
    fn fix_name_stops_at_nul() {
        let mut fix = FbFixScreeninfo::default();
        fix.id[..7].copy_from_slice(b"simplef");
        assert_eq!(fix.name(), "simplef");
    }

    #[test]
    fn open_missing_device_names_operation() {
        let err = Framebuffer::open(Path::new("/nonexistent/fb9")).unwrap_err();
        assert!(err.to_string().starts_with("open framebuffer: "));
    }

    #[test]
    fn regular_file_is_not_a_framebuffer() {
        let file = tempfile::NamedTempFile::new().unwrap();
        let err = Framebuffer::open(file.path()).unwrap_err();
        assert!(matches!(err, Error::Device { op: "FBIOGET_FSCREENINFO", .. }));
    }
}
