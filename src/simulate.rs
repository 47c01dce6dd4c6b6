//! Random sequences and mutated copies for tests and benches.

use rand::prelude::*;

pub static NUC: [u8; 4] = [b'A', b'C', b'G', b'T'];

/// Nucleotides plus the ambiguity codes the default score matrix understands.
pub static IUPAC: [u8; 16] = [
    b'A', b'C', b'G', b'T', b'R', b'Y', b'S', b'W',
    b'K', b'M', b'B', b'D', b'H', b'V', b'N', b'U'
];

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
enum Edit {
    Keep,
    Substitute,
    Insert,
    Delete
}

/// `length` symbols drawn uniformly from `alpha`, which must not be empty.
pub fn rand_str<R: Rng>(length: usize, alpha: &[u8], rng: &mut R) -> Vec<u8> {
    (0..length).map(|_| alpha[rng.gen_range(0..alpha.len())]).collect()
}

/// Copy of `a` with between `3k/4` and `k` random edits.
///
/// Each edit substitutes, inserts before or deletes one position; a substitution
/// always changes the symbol when `alpha` has more than one.
pub fn rand_mutate<R: Rng>(a: &[u8], k: usize, alpha: &[u8], rng: &mut R) -> Vec<u8> {
    let count = rng.gen_range(k * 3 / 4..=k).min(a.len());
    let mut edits = vec![Edit::Keep; a.len()];
    for idx in rand::seq::index::sample(rng, a.len(), count).into_iter() {
        edits[idx] = [Edit::Substitute, Edit::Insert, Edit::Delete][rng.gen_range(0..3)];
    }

    let mut b = Vec::with_capacity(a.len() + count);
    for (&c, &edit) in a.iter().zip(&edits) {
        match edit {
            Edit::Keep => b.push(c),
            Edit::Substitute => {
                let others = alpha.iter().copied().filter(|&x| x != c).collect::<Vec<_>>();
                b.push(if others.is_empty() { c } else { others[rng.gen_range(0..others.len())] });
            },
            Edit::Insert => {
                b.push(alpha[rng.gen_range(0..alpha.len())]);
                b.push(c);
            },
            Edit::Delete => ()
        }
    }
    b
}

/// `core` surrounded by random flanks of `flank` symbols on each side, for
/// local alignment workloads.
pub fn rand_embed<R: Rng>(core: &[u8], flank: usize, alpha: &[u8], rng: &mut R) -> Vec<u8> {
    let mut res = rand_str(flank, alpha, rng);
    res.extend_from_slice(core);
    res.extend(rand_str(flank, alpha, rng));
    res
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rand_str() {
        let mut rng = StdRng::seed_from_u64(1);
        let s = rand_str(500, &NUC, &mut rng);
        assert_eq!(s.len(), 500);
        assert!(s.iter().all(|c| NUC.contains(c)));
        assert!(NUC.iter().all(|c| s.contains(c)));
    }

    #[test]
    fn test_rand_mutate() {
        let mut rng = StdRng::seed_from_u64(2);
        let a = rand_str(200, &IUPAC, &mut rng);
        assert_eq!(rand_mutate(&a, 0, &IUPAC, &mut rng), a);

        let b = rand_mutate(&a, 40, &IUPAC, &mut rng);
        assert_ne!(a, b);
        assert!(b.len() >= a.len() - 40 && b.len() <= a.len() + 40);
        assert!(b.iter().all(|c| IUPAC.contains(c)));
    }

    #[test]
    fn test_rand_embed() {
        let mut rng = StdRng::seed_from_u64(3);
        let r = rand_embed(b"ACGTACGT", 10, &NUC, &mut rng);
        assert_eq!(r.len(), 28);
        assert_eq!(&r[10..18], b"ACGTACGT");
    }
}
