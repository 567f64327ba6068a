/// Convert client (viewport) coordinates to canvas pixels.
///
/// The canvas may be scaled by CSS, so the element's rendered size and its
/// drawing-buffer size can differ; both axes are rescaled independently.
#[allow(clippy::too_many_arguments)]
pub fn client_to_canvas(
    client_x: f64,
    client_y: f64,
    rect_left: f64,
    rect_top: f64,
    rect_w: f64,
    rect_h: f64,
    canvas_w: f64,
    canvas_h: f64,
) -> Option<(f64, f64)> {
    if rect_w <= 0.0 || rect_h <= 0.0 {
        return None;
    }
    Some((
        (client_x - rect_left) * canvas_w / rect_w,
        (client_y - rect_top) * canvas_h / rect_h,
    ))
}

/// Scale a client-space drag distance into canvas pixels.
pub fn client_delta_to_canvas(
    dx: f64,
    dy: f64,
    rect_w: f64,
    rect_h: f64,
    canvas_w: f64,
    canvas_h: f64,
) -> (f64, f64) {
    let sx = if rect_w > 0.0 { canvas_w / rect_w } else { 1.0 };
    let sy = if rect_h > 0.0 { canvas_h / rect_h } else { 1.0 };
    (dx * sx, dy * sy)
}

pub fn element_rect(element_id: &str) -> Option<web_sys::DomRect> {
    let document = web_sys::window()?.document()?;
    let element = document.get_element_by_id(element_id)?;
    Some(element.get_bounding_client_rect())
}

/// Client coordinates to canvas pixels for the canvas with `canvas_id`.
pub fn click_to_canvas(
    client_x: f64,
    client_y: f64,
    canvas_id: &str,
    canvas_w: f64,
    canvas_h: f64,
) -> Option<(f64, f64)> {
    let rect = element_rect(canvas_id)?;
    client_to_canvas(
        client_x,
        client_y,
        rect.left(),
        rect.top(),
        rect.width(),
        rect.height(),
        canvas_w,
        canvas_h,
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_client_to_canvas_origin() {
        let (x, y) = client_to_canvas(100.0, 200.0, 100.0, 200.0, 960.0, 600.0, 960.0, 600.0).unwrap();
        assert!((x - 0.0).abs() < 1e-9);
        assert!((y - 0.0).abs() < 1e-9);
    }

    #[test]
    fn test_client_to_canvas_offset() {
        let (x, y) = client_to_canvas(450.0, 350.0, 320.0, 50.0, 960.0, 600.0, 960.0, 600.0).unwrap();
        assert!((x - 130.0).abs() < 1e-9);
        assert!((y - 300.0).abs() < 1e-9);
    }

    #[test]
    fn test_client_to_canvas_scaled_down_element() {
        // Canvas buffer is 960x600 but laid out at half size.
        let (x, y) = client_to_canvas(240.0, 150.0, 0.0, 0.0, 480.0, 300.0, 960.0, 600.0).unwrap();
        assert!((x - 480.0).abs() < 1e-9);
        assert!((y - 300.0).abs() < 1e-9);
    }

    #[test]
    fn test_client_to_canvas_zero_size_element() {
        assert!(client_to_canvas(1.0, 1.0, 0.0, 0.0, 0.0, 300.0, 960.0, 600.0).is_none());
    }

    #[test]
    fn test_client_delta_scaling() {
        let (dx, dy) = client_delta_to_canvas(10.0, -5.0, 480.0, 300.0, 960.0, 600.0);
        assert!((dx - 20.0).abs() < 1e-9);
        assert!((dy - -10.0).abs() < 1e-9);
        assert_eq!(client_delta_to_canvas(3.0, 4.0, 0.0, 0.0, 960.0, 600.0), (3.0, 4.0));
    }
}
