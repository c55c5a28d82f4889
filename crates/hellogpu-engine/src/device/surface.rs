use winit::dpi::PhysicalSize;

use super::SurfaceErrorAction;

/// Picks the first preferred format the surface supports.
///
/// Falls back to the surface's first advertised format.
pub(crate) fn choose_surface_format(
    caps: &wgpu::SurfaceCapabilities,
    preferred: &[wgpu::TextureFormat],
) -> Option<wgpu::TextureFormat> {
    if caps.formats.is_empty() {
        return None;
    }

    preferred
        .iter()
        .copied()
        .find(|f| caps.formats.contains(f))
        .or_else(|| caps.formats.first().copied())
}

pub(crate) fn choose_alpha_mode(
    caps: &wgpu::SurfaceCapabilities,
    requested: Option<wgpu::CompositeAlphaMode>,
) -> wgpu::CompositeAlphaMode {
    requested
        .filter(|m| caps.alpha_modes.contains(m))
        .or_else(|| caps.alpha_modes.first().copied())
        .unwrap_or(wgpu::CompositeAlphaMode::Auto)
}

/// wgpu does not support configuring a surface with a 0x0 size; in that case,
/// only `size` is updated and configuration is deferred.
pub(crate) fn apply_resize(
    surface: &wgpu::Surface,
    device: &wgpu::Device,
    config: &mut wgpu::SurfaceConfiguration,
    size: &mut PhysicalSize<u32>,
    new_size: PhysicalSize<u32>,
) {
    *size = new_size;
    if new_size.width == 0 || new_size.height == 0 {
        return;
    }

    config.width = new_size.width;
    config.height = new_size.height;

    surface.configure(device, config);
}

pub(crate) fn map_surface_error(
    surface: &wgpu::Surface,
    device: &wgpu::Device,
    config: &wgpu::SurfaceConfiguration,
    size: PhysicalSize<u32>,
    err: wgpu::SurfaceError,
) -> SurfaceErrorAction {
    match err {
        wgpu::SurfaceError::Lost | wgpu::SurfaceError::Outdated => {
            if size.width > 0 && size.height > 0 {
                surface.configure(device, config);
            }
            SurfaceErrorAction::Reconfigured
        }
        wgpu::SurfaceError::OutOfMemory => SurfaceErrorAction::Fatal,
        wgpu::SurfaceError::Timeout => SurfaceErrorAction::SkipFrame,
        wgpu::SurfaceError::Other => SurfaceErrorAction::SkipFrame,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn caps(formats: &[wgpu::TextureFormat]) -> wgpu::SurfaceCapabilities {
        wgpu::SurfaceCapabilities {
            formats: formats.to_vec(),
            alpha_modes: vec![wgpu::CompositeAlphaMode::Opaque],
            ..Default::default()
        }
    }

    #[test]
    fn preferred_format_is_picked_when_supported() {
        let c = caps(&[wgpu::TextureFormat::Rgba8Unorm, wgpu::TextureFormat::Bgra8Unorm]);
        let f = choose_surface_format(&c, &[wgpu::TextureFormat::Bgra8Unorm]);
        assert_eq!(f, Some(wgpu::TextureFormat::Bgra8Unorm));
    }

    #[test]
    fn falls_back_to_first_supported_format() {
        let c = caps(&[wgpu::TextureFormat::Rgba8Unorm]);
        let f = choose_surface_format(&c, &[wgpu::TextureFormat::Bgra8Unorm]);
        assert_eq!(f, Some(wgpu::TextureFormat::Rgba8Unorm));
    }

    #[test]
    fn no_formats_means_none() {
        assert_eq!(choose_surface_format(&caps(&[]), &[wgpu::TextureFormat::Bgra8Unorm]), None);
    }

    #[test]
    fn unsupported_alpha_mode_is_replaced() {
        let c = caps(&[wgpu::TextureFormat::Bgra8Unorm]);
        let m = choose_alpha_mode(&c, Some(wgpu::CompositeAlphaMode::PreMultiplied));
        assert_eq!(m, wgpu::CompositeAlphaMode::Opaque);
    }
}
