//! Bundled reference values for `db2 ..= db10`.
//!
//! - Published scaling taps in the two-scale convention (`Σc = 2`), eight
//!   significant digits.
//! - Previously computed integer values `φ(0..L)` of the scaling function.
//!   These came out of an SQP minimizer in single precision and are only good
//!   to roughly `1e-3`; they serve as a regression yardstick, not as truth.

use crate::domain::WaveletId;

const DB2_SCALING: [f64; 4] = [0.6830127, 1.1830127, 0.3169873, -0.1830127];
const DB3_SCALING: [f64; 6] = [0.47046721, 1.14111692, 0.650365, -0.19093442, -0.12083221, 0.0498175];
const DB4_SCALING: [f64; 8] = [
    0.32580343, 1.01094572, 0.89220014, -0.03957503, -0.26450717, 0.0436163, 0.0465036, -0.01498699,
];
const DB5_SCALING: [f64; 10] = [
    0.22641898, 0.85394354, 1.02432694, 0.19576696, -0.34265671, -0.04560113, 0.10970265, -0.00882680,
    -0.01779187, 0.00471742793,
];
const DB6_SCALING: [f64; 12] = [
    0.15774243, 0.69950381, 1.06226376, 0.44583132, -0.31998660, -0.18351806, 0.13788809, 0.03892321,
    -0.04466375, 0.000783251152, 0.00675606236, -0.00152353381,
];
const DB7_SCALING: [f64; 14] = [
    0.11009943, 0.56079128, 1.03114849, 0.66437248, -0.20351382, -0.31683501, 0.1008467, 0.11400345,
    -0.05378245, -0.02343994, 0.01774979, 6.07514995e-4, -2.54790472e-3, 5.00226853e-4,
];
const DB8_SCALING: [f64; 16] = [
    0.07695562, 0.44246725, 0.95548615, 0.82781653, -0.02238574, -0.40165863, 6.68194092e-4, 0.18207636,
    -0.02456390, -0.06235021, 0.01977216, 0.01236884, -6.88771926e-3, -5.54004549e-4, 9.55229711e-4,
    -1.66137261e-4,
];
const DB9_SCALING: [f64; 18] = [
    0.05385035, 0.34483430, 0.85534906, 0.92954571, 0.18836955, -0.41475176, -0.13695355, 0.21006834,
    0.043452675, -0.09564726, 3.54892813e-4, 0.03162417, -6.67962023e-3, -6.05496058e-3, 2.61296728e-3,
    3.25814671e-4, -3.56329759e-4, 5.5645514e-5,
];
const DB10_SCALING: [f64; 20] = [
    0.03771716, 0.26612218, 0.74557507, 0.97362811, 0.39763774, -0.35333620, -0.27710988, 0.18012745,
    0.13160299, -0.10096657, -0.04165925, 0.04696981, 5.10043697e-3, -0.01517900, 1.97332536e-3,
    2.81768659e-3, -9.69947840e-4, -1.64709006e-4, 1.32354367e-4, -1.875841e-5,
];

const DB2_INITIAL: [f64; 4] = [0.0, 1.36602544, -0.36602544, 0.0];
const DB3_INITIAL: [f64; 6] = [0.0, 1.28653824, -0.38600335, 0.09525722, 0.00420788, 0.0];
const DB4_INITIAL: [f64; 8] = [
    0.0, 1.00716450, -3.38492330e-2, 3.96088947e-2, -1.17337313e-2, -1.25087227e-3, 6.04419105e-5, 0.0,
];
const DB5_INITIAL: [f64; 10] = [
    0.0, 6.96581952e-1, 4.48937292e-1, -1.82376501e-1, 3.71700319e-2, 1.46173743e-3, -1.72676487e-3,
    -9.22021251e-6, -3.85275626e-5, 0.0,
];
const DB6_INITIAL: [f64; 12] = [
    0.0, 4.36587765e-1, 8.32415060e-1, -3.84521860e-1, 1.42839932e-1, -2.54773902e-2, -3.57531959e-3,
    1.91016751e-3, -1.10661322e-4, -2.25974137e-5, -4.50963101e-5, 0.0,
];
const DB7_INITIAL: [f64; 14] = [
    0.0, 2.53176262e-1, 1.01001486, -3.92364768e-1, 1.84666057e-1, -6.69130292e-2, 1.06144460e-2,
    1.37177938e-3, -5.07771756e-4, 1.53516516e-5, 1.07593726e-4, -4.55972386e-5, -1.35180833e-4, 0.0,
];
const DB8_INITIAL: [f64; 16] = [
    0.0, 1.37000734e-1, 9.91912754e-1, -1.68983598e-1, 7.11450154e-2, -4.90054741e-2, 2.35716063e-2,
    -6.27419915e-3, 7.81445865e-4, -1.43491763e-4, 2.40767243e-5, -6.04642158e-5, -4.20163080e-6,
    7.16157238e-6, 2.86356112e-5, 0.0,
];
const DB9_INITIAL: [f64; 18] = [
    0.0, 7.00238649e-2, 8.48016140e-1, 1.91746375e-1, -1.61539948e-1, 6.22122513e-2, -6.38616197e-3,
    -8.02645550e-3, 5.45690991e-3, -1.52196195e-3, -1.42990994e-4, -2.46778588e-4, 1.37316571e-4,
    2.95254176e-4, 6.69555476e-5, -8.34085913e-5, -7.36113108e-6, 0.0,
];
const DB10_INITIAL: [f64; 20] = [
    0.0, 3.35022410e-2, 6.52441286e-1, 5.55187364e-1, -3.80546580e-1, 2.02254237e-1, -8.02421839e-2,
    1.70954422e-2, 2.17394433e-3, -2.21139656e-3, 2.66167187e-4, -7.60169294e-5, 1.53443445e-5,
    1.66660591e-4, -1.20277572e-4, 1.02015014e-4, 2.28888562e-4, -2.04018674e-4, -3.31164517e-5, 0.0,
];

/// Published two-scale taps (`Σc = 2`), if bundled for `id`.
pub fn published_scaling(id: WaveletId) -> Option<&'static [f64]> {
    match id.order() {
        2 => Some(&DB2_SCALING),
        3 => Some(&DB3_SCALING),
        4 => Some(&DB4_SCALING),
        5 => Some(&DB5_SCALING),
        6 => Some(&DB6_SCALING),
        7 => Some(&DB7_SCALING),
        8 => Some(&DB8_SCALING),
        9 => Some(&DB9_SCALING),
        10 => Some(&DB10_SCALING),
        _ => None,
    }
}

/// Reference `φ(0..L)` including the boundary zeros, if bundled for `id`.
pub fn reference_initial_values(id: WaveletId) -> Option<&'static [f64]> {
    match id.order() {
        2 => Some(&DB2_INITIAL),
        3 => Some(&DB3_INITIAL),
        4 => Some(&DB4_INITIAL),
        5 => Some(&DB5_INITIAL),
        6 => Some(&DB6_INITIAL),
        7 => Some(&DB7_INITIAL),
        8 => Some(&DB8_INITIAL),
        9 => Some(&DB9_INITIAL),
        10 => Some(&DB10_INITIAL),
        _ => None,
    }
}

/// Largest absolute difference between `padded` and the bundled reference.
///
/// `None` when nothing is bundled for `id` or the lengths disagree.
pub fn max_reference_deviation(id: WaveletId, padded: &[f64]) -> Option<f64> {
    let reference = reference_initial_values(id)?;
    if reference.len() != padded.len() {
        return None;
    }
    Some(
        reference
            .iter()
            .zip(padded)
            .map(|(r, v)| (r - v).abs())
            .fold(0.0, f64::max),
    )
}
