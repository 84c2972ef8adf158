//! Sprite sheet slicing: cut a packed sheet image into equal-sized frames.

use std::rc::Rc;

use crate::core::rect::Rect;
use crate::error::{Error, Result};
use crate::renderer::pixmap::Pixmap;

/// Cut `count` frames of `frame_w × frame_h` from a single horizontal row
/// starting at `(x, y)`.
///
/// Fails when the frames would read past the sheet's edge or any dimension
/// is zero.
pub fn slice_row(
    sheet: &Pixmap,
    x: i32,
    y: i32,
    frame_w: u32,
    frame_h: u32,
    count: usize,
) -> Result<Vec<Rc<Pixmap>>> {
    if frame_w == 0 || frame_h == 0 || count == 0 {
        return Err(Error::InvalidArgument(
            "frame size and count must be nonzero".into(),
        ));
    }
    let end_x = x + (frame_w as i32) * count as i32;
    if x < 0 || y < 0 || end_x > sheet.width() as i32 || y + frame_h as i32 > sheet.height() as i32
    {
        return Err(Error::InvalidArgument(format!(
            "row of {} {}x{} frames at ({}, {}) exceeds {}x{} sheet",
            count,
            frame_w,
            frame_h,
            x,
            y,
            sheet.width(),
            sheet.height()
        )));
    }

    let mut frames = Vec::with_capacity(count);
    for i in 0..count {
        let rect = Rect::new(x + (frame_w as i32) * i as i32, y, frame_w, frame_h);
        frames.push(Rc::new(sheet.sub_region(rect)));
    }
    Ok(frames)
}

/// Cut a full grid of frames, row-major. The sheet must tile exactly.
pub fn slice_grid(sheet: &Pixmap, frame_w: u32, frame_h: u32) -> Result<Vec<Rc<Pixmap>>> {
    if frame_w == 0 || frame_h == 0 {
        return Err(Error::InvalidArgument("frame size must be nonzero".into()));
    }
    if sheet.width() % frame_w != 0 || sheet.height() % frame_h != 0 {
        return Err(Error::InvalidArgument(format!(
            "{}x{} frames do not tile a {}x{} sheet",
            frame_w,
            frame_h,
            sheet.width(),
            sheet.height()
        )));
    }

    let cols = (sheet.width() / frame_w) as usize;
    let rows = (sheet.height() / frame_h) as usize;
    let mut frames = Vec::with_capacity(cols * rows);
    for row in 0..rows {
        let mut strip = slice_row(
            sheet,
            0,
            (frame_h as i32) * row as i32,
            frame_w,
            frame_h,
            cols,
        )?;
        frames.append(&mut strip);
    }
    Ok(frames)
}
