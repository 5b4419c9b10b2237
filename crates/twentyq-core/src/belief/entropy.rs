/// Shannon entropy in bits. Inputs need not sum to one; non-positive values are ignored.
pub fn entropy<I>(probabilities: I) -> f64
where
    I: IntoIterator<Item = f64>,
{
    let positive: Vec<f64> = probabilities.into_iter().filter(|p| *p > 0.0).collect();
    if positive.len() < 2 {
        return 0.0;
    }
    -positive.iter().map(|p| p * p.log2()).sum::<f64>()
}
