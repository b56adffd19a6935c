/// Mean of `sum / count` rounded half up to one decimal place.
///
/// Works on integers so every store computes the same value bit for bit.
pub fn rounded_mean(sum: i64, count: i64) -> f64 {
    if count <= 0 {
        return 0.0;
    }

    let tenths = (sum * 20 + count) / (2 * count);
    tenths as f64 / 10.0
}
