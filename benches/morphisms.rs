#[macro_use]
extern crate criterion;

use criterion::BenchmarkId;
use criterion::Criterion;

use rand::rngs::StdRng;
use rand::SeedableRng;

use ec_morphism::mocks::{LatticeCurve, LatticeHom, LatticePoint};
use ec_morphism::{
    compare_by_evaluation, compose, find_post_isomorphism, matrix_on_subgroup, Hom, Morphism,
    Sampler, TorsionBasis,
};

static CHAIN_LENGTHS: [usize; 4] = [1, 4, 16, 64];

fn isogeny_pair(base: u64) -> (LatticeCurve, Hom<LatticeCurve>, Hom<LatticeCurve>) {
    let e = LatticeCurve::finite("E", 0, base);
    let e1 = LatticeCurve::finite("E1", 1, base);
    let phi = LatticeHom::isogeny(&e, &e1, [[1, 1], [0, 2]]).unwrap();
    let dual = phi.dual().unwrap();
    (e, phi, dual)
}

mod composition_benches {
    use super::*;

    fn compose_chain(c: &mut Criterion) {
        let (_, phi, dual) = isogeny_pair(101);
        let mut group = c.benchmark_group("Composite construction");
        for &length in CHAIN_LENGTHS.iter() {
            group.bench_with_input(BenchmarkId::from_parameter(length), &length, |b, &length| {
                b.iter(|| {
                    let mut h = compose(&dual, &phi).unwrap();
                    for _ in 1..length {
                        h = compose(&h, &compose(&dual, &phi).unwrap()).unwrap();
                    }
                    h
                })
            });
        }
        group.finish();
    }

    criterion_group! {
        name = composition_benches;
        config = Criterion::default();
        targets =
        compose_chain,
    }
}

mod comparison_benches {
    use super::*;

    fn compare_dual_with_scalar(c: &mut Criterion) {
        let (e, phi, dual) = isogeny_pair(3);
        let psi = compose(&dual, &phi).unwrap();
        let two = LatticeHom::scalar(&e, 2);
        let mut rng = StdRng::seed_from_u64(0);
        c.bench_function("Compare by evaluation, finite field", move |b| {
            b.iter(|| {
                let mut sampler = Sampler::new(&mut rng);
                compare_by_evaluation(&*psi, &*two, &mut sampler).unwrap()
            })
        });
    }

    fn align_up_to_isomorphism(c: &mut Criterion) {
        let (_, phi, _) = isogeny_pair(7);
        let e1 = phi.codomain().clone();
        let e2 = LatticeCurve::finite("E2", 1, 7);
        let alpha = LatticeHom::isomorphism(&e1, &e2, -1).unwrap();
        let psi = compose(&alpha, &phi).unwrap();
        let mut rng = StdRng::seed_from_u64(1);
        c.bench_function("Find post-isomorphism, finite field", move |b| {
            b.iter(|| {
                let mut sampler = Sampler::new(&mut rng);
                find_post_isomorphism(&*phi, &*psi, &mut sampler).unwrap()
            })
        });
    }

    criterion_group! {
        name = comparison_benches;
        config = Criterion::default();
        targets =
        compare_dual_with_scalar,
        align_up_to_isomorphism,
    }
}

mod torsion_benches {
    use super::*;

    fn torsion_action(c: &mut Criterion) {
        let (_, phi, dual) = isogeny_pair(101);
        let psi = compose(&dual, &phi).unwrap();
        let basis = TorsionBasis::new(
            LatticePoint::torsion(1, 0, 101),
            LatticePoint::torsion(3, 1, 101),
        );
        c.bench_function("Torsion action of a composite", move |b| {
            b.iter(|| matrix_on_subgroup(&*psi, &basis, None).unwrap())
        });
    }

    criterion_group! {
        name = torsion_benches;
        config = Criterion::default();
        targets =
        torsion_action,
    }
}

criterion_main!(
    composition_benches::composition_benches,
    comparison_benches::comparison_benches,
    torsion_benches::torsion_benches,
);
