use ndarray::Array2;

/// Bilinear resize of a saliency plane to a new spatial shape. Pose
/// models emit heatmaps at a model-native resolution that rarely
/// matches the frame size.
pub fn linear_interpolate(input: Array2<f32>, new_shape: (usize, usize)) -> Array2<f32> {
    let (old_height, old_width) = input.dim();
    let (new_height, new_width) = new_shape;
    let mut output = Array2::<f32>::zeros((new_height, new_width));

    for i in 0..new_height {
        for j in 0..new_width {
            let x = (j as f32) / (new_width as f32) * (old_width as f32 - 1.0);
            let y = (i as f32) / (new_height as f32) * (old_height as f32 - 1.0);

            let x0 = x.floor() as usize;
            let x1 = x.ceil() as usize;
            let y0 = y.floor() as usize;
            let y1 = y.ceil() as usize;

            let p00 = input[[y0, x0]];
            let p01 = input[[y0, x1]];
            let p10 = input[[y1, x0]];
            let p11 = input[[y1, x1]];

            let dx = x - x0 as f32;
            let dy = y - y0 as f32;

            output[[i, j]] = p00 * (1.0 - dx) * (1.0 - dy)
                + p01 * dx * (1.0 - dy)
                + p10 * (1.0 - dx) * dy
                + p11 * dx * dy;
        }
    }

    output
}
