use fftgen_fft::{
    Complex, Configuration, Direction, GeneratorConfig, KernelFamily, Precision, TransformKind, UserModule,
};
use fftgen_ir::BinaryOp;
use test_case::test_case;

use super::super::{dft, max_error, pvc};
use crate::error::Error;
use crate::memory::{Memory, Pointer};
use crate::plan::HostPlan;
use crate::value::Value;

/// Deterministic test signal with components in `[-0.5, 0.5)`.
fn signal(len: usize, seed: usize) -> Vec<Complex> {
    (0..len)
        .map(|i| {
            let re = ((i * 7 + seed * 13) % 31) as f64 / 31.0 - 0.5;
            let im = ((i * 11 + seed * 3) % 17) as f64 / 17.0 - 0.5;
            Complex::new(re, im)
        })
        .collect()
}

fn interleave(x: &[Complex]) -> Vec<f64> {
    x.iter().flat_map(|c| [c.re, c.im]).collect()
}

fn complexes(data: &[f64]) -> Vec<Complex> {
    data.chunks_exact(2).map(|c| Complex::new(c[0], c[1])).collect()
}

fn tolerance(n: usize, precision: Precision) -> f64 {
    let eps = match precision {
        Precision::F32 => f32::EPSILON as f64,
        Precision::F64 => f64::EPSILON,
    };
    16.0 * eps * n as f64 * ((n as f64).log2() + 1.0)
}

/// Runs `cfg` in place on `data`.
fn run(cfg: &Configuration, policy: &GeneratorConfig, data: &[f64]) -> Vec<f64> {
    let plan = HostPlan::new(cfg, &pvc(), policy).unwrap();
    let mut memory = Memory::new();
    let buffer = memory.alloc_floats(data);
    plan.execute(&mut memory, buffer, buffer, None).unwrap();
    memory.floats(buffer).unwrap()
}

/// Compares every `(m, k)` column of a packed `M x N x K` c2c result with the DFT of its input.
fn check_c2c(x: &[Complex], y: &[Complex], (m, n, k): (usize, usize, usize), sign: f64, precision: Precision) {
    for mi in 0..m {
        for ki in 0..k {
            let index = |j: usize| mi + j * m + ki * m * n;
            let column: Vec<Complex> = (0..n).map(|j| x[index(j)]).collect();
            let actual: Vec<Complex> = (0..n).map(|j| y[index(j)]).collect();
            let err = max_error(&actual, &dft(&column, sign));
            assert!(err < tolerance(n, precision), "column ({mi}, {ki}) of N = {n}: error {err}\n{actual:?}");
        }
    }
}

// =============================================================================
// Complex transforms
// =============================================================================

#[test_case(2 ; "n2")]
#[test_case(3 ; "n3")]
#[test_case(4 ; "n4")]
#[test_case(5 ; "n5")]
#[test_case(7 ; "n7")]
#[test_case(8 ; "n8")]
#[test_case(16 ; "n16")]
#[test_case(27 ; "n27")]
#[test_case(32 ; "n32")]
#[test_case(128 ; "n128 two factor")]
fn test_c2c_forward_matches_dft(n: usize) {
    let (m, k) = (3, 5);
    let cfg = Configuration::new_1d(m, n, k, Precision::F32, Direction::Forward, TransformKind::C2c);
    let x = signal(m * n * k, n);
    let y = complexes(&run(&cfg, &GeneratorConfig::default(), &interleave(&x)));
    check_c2c(&x, &y, (m, n, k), -1.0, Precision::F32);
}

#[test]
fn test_c2c_backward_matches_dft() {
    let (m, n, k) = (2, 12, 3);
    let cfg = Configuration::new_1d(m, n, k, Precision::F32, Direction::Backward, TransformKind::C2c);
    let x = signal(m * n * k, 1);
    let y = complexes(&run(&cfg, &GeneratorConfig::default(), &interleave(&x)));
    check_c2c(&x, &y, (m, n, k), 1.0, Precision::F32);
}

#[test]
fn test_c2c_double_precision() {
    let (m, n, k) = (1, 16, 4);
    let cfg = Configuration::new_1d(m, n, k, Precision::F64, Direction::Forward, TransformKind::C2c);
    let x = signal(m * n * k, 2);
    let y = complexes(&run(&cfg, &GeneratorConfig::default(), &interleave(&x)));
    check_c2c(&x, &y, (m, n, k), -1.0, Precision::F64);
}

#[test]
fn test_impulse_from_complex_exponential() {
    let (n, f) = (16, 3);
    let cfg = Configuration::new_1d(1, n, 1, Precision::F32, Direction::Forward, TransformKind::C2c);
    let x: Vec<Complex> = (0..n)
        .map(|j| {
            let (s, c) = (std::f64::consts::TAU * (j * f) as f64 / n as f64).sin_cos();
            Complex::new(c, s)
        })
        .collect();
    let y = complexes(&run(&cfg, &GeneratorConfig::default(), &interleave(&x)));
    for (k, v) in y.iter().enumerate() {
        let expected = if k == f { n as f64 } else { 0.0 };
        assert!((v.re - expected).abs() < 1e-4 && v.im.abs() < 1e-4, "bin {k}: {v:?}");
    }
}

#[test_case(1, 1 ; "m1 k1")]
#[test_case(1, 16 ; "m1 k16")]
#[test_case(1, 33 ; "m1 k33")]
#[test_case(3, 1 ; "m3 k1")]
#[test_case(3, 16 ; "m3 k16")]
#[test_case(3, 33 ; "m3 k33")]
#[test_case(32, 1 ; "m32 k1")]
#[test_case(32, 16 ; "m32 k16")]
#[test_case(32, 33 ; "m32 k33")]
fn test_round_trip_scales_by_n(m: usize, k: usize) {
    let n = 8;
    let policy = GeneratorConfig::default();
    let forward = Configuration::new_1d(m, n, k, Precision::F32, Direction::Forward, TransformKind::C2c);
    let backward = Configuration::new_1d(m, n, k, Precision::F32, Direction::Backward, TransformKind::C2c);
    let x = signal(m * n * k, m + k);

    let mut memory = Memory::new();
    let buffer = memory.alloc_floats(&interleave(&x));
    HostPlan::new(&forward, &pvc(), &policy).unwrap().execute(&mut memory, buffer, buffer, None).unwrap();
    HostPlan::new(&backward, &pvc(), &policy).unwrap().execute(&mut memory, buffer, buffer, None).unwrap();

    let y = complexes(&memory.floats(buffer).unwrap());
    let scaled: Vec<Complex> = x.iter().map(|c| Complex::new(c.re * n as f64, c.im * n as f64)).collect();
    let err = max_error(&y, &scaled);
    assert!(err < tolerance(n, Precision::F32), "error {err}");
}

#[test_case(64 ; "power of two")]
#[test_case(45 ; "odd composite")]
fn test_forced_two_factor_kernel(n: usize) {
    let (m, k) = (2, 3);
    let policy = GeneratorConfig::builder().force_family(KernelFamily::Factor2Slm).build();
    let cfg = Configuration::new_1d(m, n, k, Precision::F32, Direction::Forward, TransformKind::C2c);
    let plan = HostPlan::new(&cfg, &pvc(), &policy).unwrap();
    assert!(plan.stages()[0].kernel.starts_with("f2fft_"), "{}", plan.stages()[0].kernel);

    let x = signal(m * n * k, 4);
    let y = complexes(&run(&cfg, &policy, &interleave(&x)));
    check_c2c(&x, &y, (m, n, k), -1.0, Precision::F32);
}

#[test]
fn test_two_dimensional_transform() {
    let (m, n1, n2, k) = (2, 4, 6, 3);
    let cfg = Configuration::new(2, &[m, n1, n2, k], Precision::F32, Direction::Forward, TransformKind::C2c, true);
    let plan = HostPlan::new(&cfg, &pvc(), &GeneratorConfig::default()).unwrap();
    assert_eq!(plan.stages().len(), 2);

    let x = signal(m * n1 * n2 * k, 5);
    let y = complexes(&run(&cfg, &GeneratorConfig::default(), &interleave(&x)));
    let index = |mi: usize, j1: usize, j2: usize, ki: usize| mi + j1 * m + j2 * m * n1 + ki * m * n1 * n2;
    for mi in 0..m {
        for ki in 0..k {
            // Rows first, then columns.
            let rows: Vec<Vec<Complex>> = (0..n2)
                .map(|j2| dft(&(0..n1).map(|j1| x[index(mi, j1, j2, ki)]).collect::<Vec<_>>(), -1.0))
                .collect();
            for k1 in 0..n1 {
                let expected = dft(&(0..n2).map(|j2| rows[j2][k1]).collect::<Vec<_>>(), -1.0);
                let actual: Vec<Complex> = (0..n2).map(|k2| y[index(mi, k1, k2, ki)]).collect();
                let err = max_error(&actual, &expected);
                assert!(err < tolerance(n1 * n2, Precision::F32), "({mi}, {k1}, {ki}): error {err}");
            }
        }
    }
}

// =============================================================================
// Real transforms
// =============================================================================

#[test_case(8 ; "even")]
#[test_case(15 ; "odd")]
#[test_case(16 ; "even sixteen")]
fn test_r2c_matches_dft(n: usize) {
    let (m, k) = (2, 3);
    let h = n / 2 + 1;
    let cfg = Configuration::new_1d(m, n, k, Precision::F32, Direction::Forward, TransformKind::R2c);
    let real: Vec<f64> = signal(m * n * k, n).iter().map(|c| c.re).collect();

    // In place: columns of n reals padded to 2h.
    let mut data = vec![0.0; m * 2 * h * k];
    for mi in 0..m {
        for ki in 0..k {
            for j in 0..n {
                data[mi + j * m + ki * m * 2 * h] = real[mi + j * m + ki * m * n];
            }
        }
    }
    let y = complexes(&run(&cfg, &GeneratorConfig::default(), &data));

    for mi in 0..m {
        for ki in 0..k {
            let column: Vec<Complex> = (0..n).map(|j| Complex::new(real[mi + j * m + ki * m * n], 0.0)).collect();
            let expected = &dft(&column, -1.0)[..h];
            let actual: Vec<Complex> = (0..h).map(|j| y[mi + j * m + ki * m * h]).collect();
            let err = max_error(&actual, expected);
            assert!(err < tolerance(n, Precision::F32), "column ({mi}, {ki}) of N = {n}: error {err}\n{actual:?}");
        }
    }
}

#[test_case(8 ; "even")]
#[test_case(15 ; "odd")]
fn test_c2r_inverts_r2c(n: usize) {
    let (m, k) = (2, 3);
    let h = n / 2 + 1;
    let cfg = Configuration::new_1d(m, n, k, Precision::F32, Direction::Backward, TransformKind::C2r);
    let real: Vec<f64> = signal(m * n * k, n + 1).iter().map(|c| c.im).collect();

    let mut spectrum = vec![Complex::ZERO; m * h * k];
    for mi in 0..m {
        for ki in 0..k {
            let column: Vec<Complex> = (0..n).map(|j| Complex::new(real[mi + j * m + ki * m * n], 0.0)).collect();
            for (j, v) in dft(&column, -1.0).into_iter().take(h).enumerate() {
                spectrum[mi + j * m + ki * m * h] = v;
            }
        }
    }
    let y = run(&cfg, &GeneratorConfig::default(), &interleave(&spectrum));

    for mi in 0..m {
        for ki in 0..k {
            for j in 0..n {
                let actual = y[mi + j * m + ki * m * 2 * h];
                let expected = n as f64 * real[mi + j * m + ki * m * n];
                assert!(
                    (actual - expected).abs() < tolerance(n, Precision::F32),
                    "({mi}, {j}, {ki}) of N = {n}: {actual} vs {expected}"
                );
            }
        }
    }
}

// =============================================================================
// Callbacks and plan arguments
// =============================================================================

fn callback_config() -> Configuration {
    let module = UserModule {
        source: String::new(),
        load_function: Some("scaled_load".into()),
        store_function: Some("plain_store".into()),
    };
    Configuration::new_1d(2, 16, 4, Precision::F32, Direction::Forward, TransformKind::C2c).with_callbacks(module)
}

#[test]
fn test_callbacks_receive_user_data() {
    let (m, n, k) = (2, 16, 4);
    let mut plan = HostPlan::new(&callback_config(), &pvc(), &GeneratorConfig::default()).unwrap();
    plan.register("scaled_load", |memory, args| {
        let value = memory.read(args[0].pointer()?.offset_by(args[1].index()?))?;
        let scale = memory.read(args[2].pointer()?)?;
        Value::arith(BinaryOp::Multiply, &value, &scale)
    });
    plan.register("plain_store", |memory, args| {
        memory.write(args[0].pointer()?.offset_by(args[1].index()?), &args[2])?;
        Ok(Value::Void)
    });

    let x = signal(m * n * k, 6);
    let mut memory = Memory::new();
    let scale = memory.alloc_floats(&[2.0]);
    let buffer = memory.alloc_floats(&interleave(&x));
    plan.execute(&mut memory, buffer, buffer, Some(Value::Pointer(Pointer::new(scale)))).unwrap();

    let doubled: Vec<Complex> = x.iter().map(|c| Complex::new(2.0 * c.re, 2.0 * c.im)).collect();
    let y = complexes(&memory.floats(buffer).unwrap());
    check_c2c(&doubled, &y, (m, n, k), -1.0, Precision::F32);
}

#[test]
fn test_missing_user_data() {
    let plan = HostPlan::new(&callback_config(), &pvc(), &GeneratorConfig::default()).unwrap();
    let mut memory = Memory::new();
    let buffer = memory.alloc_floats(&vec![0.0; 2 * 16 * 4 * 2]);
    let err = plan.execute(&mut memory, buffer, buffer, None).unwrap_err();
    assert!(matches!(err, Error::PlanArguments { .. }), "{err}");
}

#[test]
fn test_unregistered_callback() {
    let plan = HostPlan::new(&callback_config(), &pvc(), &GeneratorConfig::default()).unwrap();
    let mut memory = Memory::new();
    let buffer = memory.alloc_floats(&vec![0.0; 2 * 16 * 4 * 2]);
    let user_data = Some(Value::Pointer(Pointer::new(buffer)));
    let err = plan.execute(&mut memory, buffer, buffer, user_data).unwrap_err();
    assert!(matches!(err, Error::UnknownFunction { ref name } if name == "scaled_load"), "{err}");
}

#[test]
fn test_partial_real_batch_rejected_in_place() {
    let cfg = Configuration::new_1d(64, 8, 1, Precision::F32, Direction::Forward, TransformKind::R2c);
    let err = HostPlan::new(&cfg, &pvc(), &GeneratorConfig::default()).err().unwrap();
    assert!(matches!(err, Error::Fft { source: fftgen_fft::Error::InplaceUnsupported { .. } }), "{err}");
}
