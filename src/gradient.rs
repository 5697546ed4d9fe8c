use crate::frame::{Frame, FrameParameters, PixelFormat};

/// Number of steps in one sweep of the pattern. Step indices are taken
/// modulo this period, so any step value is valid.
pub const CYCLE_PERIOD: u32 = 90;

const FULL_SCALE_8: f64 = 255.999;
const FULL_SCALE_16: f64 = 65535.999;

/// Generate one frame of the test pattern for the given step.
///
/// RGB frames sweep from all red to all blue over one period, with a
/// diagonal green ramp across the image. Gray frames carry the same
/// diagonal ramp at the format's full scale, fading out over the period.
pub fn gradient_frame(params: FrameParameters, step: u32) -> Frame {
    let mut frame = Frame::new(params);
    fill_gradient(&mut frame, step);
    frame
}

/// Fill an existing frame buffer with the pattern for the given step.
pub fn fill_gradient(frame: &mut Frame, step: u32) {
    let step = step % CYCLE_PERIOD;
    match frame.params().format {
        PixelFormat::Rgb => fill_rgb(frame, step),
        PixelFormat::Gray8 => fill_gray8(frame, step),
        PixelFormat::Gray16Be => fill_gray16(frame, step, true),
        PixelFormat::Gray16Le => fill_gray16(frame, step, false),
    }
}

/// Red and blue sweep linearly and oppositely across the period.
fn sweep(step: u32) -> f64 {
    (CYCLE_PERIOD - step) as f64 / CYCLE_PERIOD as f64
}

/// Diagonal ramp over the image plane, in [0, 1).
fn spatial_ratio(col: usize, row: usize, params: &FrameParameters) -> f64 {
    (col + row * 2) as f64 / (params.width + params.height * 2) as f64
}

fn fill_rgb(frame: &mut Frame, step: u32) {
    let params = frame.params();
    let r = (FULL_SCALE_8 * sweep(step)) as u8;
    let b = (FULL_SCALE_8 * step as f64 / CYCLE_PERIOD as f64) as u8;
    let data = frame.data_mut();
    for row in 0..params.height {
        for col in 0..params.width {
            let g = (FULL_SCALE_8 * spatial_ratio(col, row, &params)) as u8;
            let i = 3 * (row * params.width + col);
            data[i] = r;
            data[i + 1] = g;
            data[i + 2] = b;
        }
    }
}

fn fill_gray8(frame: &mut Frame, step: u32) {
    let params = frame.params();
    let fade = sweep(step);
    let data = frame.data_mut();
    for row in 0..params.height {
        for col in 0..params.width {
            let v = (FULL_SCALE_8 * spatial_ratio(col, row, &params) * fade) as u8;
            data[row * params.width + col] = v;
        }
    }
}

fn fill_gray16(frame: &mut Frame, step: u32, big_endian: bool) {
    let params = frame.params();
    let fade = sweep(step);
    let data = frame.data_mut();
    for row in 0..params.height {
        for col in 0..params.width {
            let v = (FULL_SCALE_16 * spatial_ratio(col, row, &params) * fade) as u16;
            let bytes = if big_endian {
                v.to_be_bytes()
            } else {
                v.to_le_bytes()
            };
            let i = 2 * (row * params.width + col);
            data[i] = bytes[0];
            data[i + 1] = bytes[1];
        }
    }
}
