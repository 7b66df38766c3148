//! Operation sequence generation

use rand::seq::SliceRandom;
use rand::Rng;

use super::{Operation, OperationCounts, WorkloadMix};

/// Generate `m` operations with tag counts fixed by `mix`, in random order.
///
/// The tags are laid out Member, Insert, Delete and then shuffled with a
/// Fisher-Yates pass, so the multiset of tags is exactly
/// [`OperationCounts::for_mix`] and only the order is random.
pub fn generate<R: Rng + ?Sized>(m: usize, mix: &WorkloadMix, rng: &mut R) -> Vec<Operation> {
    let counts = OperationCounts::for_mix(m, mix);

    let mut ops = Vec::with_capacity(m);
    for (op, count) in [
        (Operation::Member, counts.member),
        (Operation::Insert, counts.insert),
        (Operation::Delete, counts.delete),
    ] {
        ops.extend(std::iter::repeat(op).take(count as usize));
    }

    // walks i from m-1 down to 1, swapping with a uniform j in [0, i]
    ops.shuffle(rng);
    ops
}
