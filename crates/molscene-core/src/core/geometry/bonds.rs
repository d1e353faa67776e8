use crate::core::models::atom::Atom;
use crate::core::models::bond::Bond;
use crate::core::models::element;
use itertools::Itertools;

/// Infers bonds from interatomic distances.
///
/// Every unordered pair `i < j` is visited exactly once, in ascending `i` then ascending
/// `j`, and a bond is emitted when the pair's separation is strictly below the threshold
/// for its element pair. The scan is quadratic, which is fine for the catalyst-sized
/// molecules this crate renders.
pub fn infer(atoms: &[Atom]) -> Vec<Bond> {
    (0..atoms.len())
        .tuple_combinations()
        .filter_map(|(i, j)| {
            let (a1, a2) = (&atoms[i], &atoms[j]);
            let distance = nalgebra::distance(&a1.position, &a2.position);
            let threshold = element::bond_threshold(&a1.element, &a2.element);
            (distance < threshold).then(|| Bond {
                atom1_idx: i,
                atom2_idx: j,
                start: a1.position,
                end: a2.position,
                distance,
            })
        })
        .collect()
}
