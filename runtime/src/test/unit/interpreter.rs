use fftgen_fft::generator::mixed_radix::basic_inplace_subgroup;
use fftgen_fft::{Complex, Precision};
use fftgen_fft::scrambler::Unscrambler;
use fftgen_ir::prelude::*;
use test_case::test_case;

use super::super::{dft, max_error};
use crate::error::Error;
use crate::interpreter::{Interpreter, NdRange};
use crate::memory::{BufferId, Memory, Pointer};
use crate::value::Value;

fn program(fb: FunctionBuilder) -> Program {
    let mut pb = ProgramBuilder::new();
    pb.add(fb.get_product());
    pb.get_product()
}

fn global_ptr(ty: BuiltinType) -> DataType {
    DataType::pointer_to(DataType::global(ty))
}

fn uint() -> DataType {
    DataType::generic(BuiltinType::Uint)
}

fn ptr(id: BufferId) -> Value {
    Value::Pointer(Pointer::new(id))
}

fn range_1d(global: usize, local: usize) -> NdRange {
    NdRange::new([global, 1, 1], [local, 1, 1])
}

fn uints(memory: &Memory, id: BufferId) -> Vec<u64> {
    memory.lanes(id).unwrap().iter().map(|s| s.as_u64()).collect()
}

#[test]
fn test_work_item_ids() {
    let mut fb = kernel_builder("ids");
    let out = fb.argument(global_ptr(BuiltinType::Uint), "out");
    fb.attribute(Attribute::ReqdWorkGroupSize([4, 1, 1]));
    fb.body(|bb| bb.assign(out.at(get_global_id(0)), get_global_id(0) * 2 + get_group_id(0)));
    let program = program(fb);

    let mut memory = Memory::new();
    let out = memory.alloc_zeroed(8, BuiltinType::Uint);
    Interpreter::new(&program).launch("ids", &mut memory, &[ptr(out)], range_1d(8, 4)).unwrap();
    assert_eq!(uints(&memory, out), vec![0, 2, 4, 6, 9, 11, 13, 15]);
}

#[test]
fn test_two_dimensional_range() {
    let mut fb = kernel_builder("grid");
    let out = fb.argument(global_ptr(BuiltinType::Uint), "out");
    fb.body(|bb| {
        let index = get_global_id(0) + get_global_id(1) * get_global_size(0);
        bb.assign(out.at(index), get_local_id(1) * 10 + get_num_groups(1));
    });
    let program = program(fb);

    let mut memory = Memory::new();
    let out = memory.alloc_zeroed(8, BuiltinType::Uint);
    let range = NdRange::new([2, 4, 1], [2, 2, 1]);
    Interpreter::new(&program).launch("grid", &mut memory, &[ptr(out)], range).unwrap();
    assert_eq!(uints(&memory, out), vec![2, 2, 12, 12, 2, 2, 12, 12]);
}

#[test]
fn test_local_memory_is_shared_by_group() {
    let mut fb = kernel_builder("reverse");
    let input = fb.argument(global_ptr(BuiltinType::Float), "in");
    let out = fb.argument(global_ptr(BuiltinType::Float), "out");
    fb.attribute(Attribute::ReqdWorkGroupSize([4, 1, 1]));
    fb.body(|bb| {
        let buf = bb.declare(DataType::array_of(DataType::local(BuiltinType::Float), 4), "buf");
        let lid = bb.declare_assign(uint(), "lid", get_local_id(0));
        let gid = bb.declare_assign(uint(), "gid", get_global_id(0));
        bb.assign(buf.at(&lid), input.at(&gid));
        bb.add(barrier(MemFenceFlag::Local));
        bb.assign(out.at(&gid), buf.at(3 - &lid));
    });
    let program = program(fb);

    let mut memory = Memory::new();
    let input = memory.alloc_floats(&[0.0, 1.0, 2.0, 3.0, 4.0, 5.0, 6.0, 7.0]);
    let out = memory.alloc_floats(&[0.0; 8]);
    Interpreter::new(&program).launch("reverse", &mut memory, &[ptr(input), ptr(out)], range_1d(8, 4)).unwrap();
    assert_eq!(memory.floats(out).unwrap(), vec![3.0, 2.0, 1.0, 0.0, 7.0, 6.0, 5.0, 4.0]);
}

#[test]
fn test_divergent_loop_trip_counts() {
    let mut fb = kernel_builder("triangle");
    let out = fb.argument(global_ptr(BuiltinType::Uint), "out");
    fb.body(|bb| {
        let lid = bb.declare_assign(uint(), "lid", get_local_id(0));
        let acc = bb.declare_assign(uint(), "acc", 0u32);
        bb.for_range(uint(), "i", 0u32, &lid, |bb, i| bb.add(acc.assign_add(i)));
        bb.assign(out.at(&lid), &acc);
    });
    let program = program(fb);

    let mut memory = Memory::new();
    let out = memory.alloc_zeroed(6, BuiltinType::Uint);
    Interpreter::new(&program).launch("triangle", &mut memory, &[ptr(out)], range_1d(6, 6)).unwrap();
    assert_eq!(uints(&memory, out), vec![0, 0, 1, 3, 6, 10]);
}

#[test]
fn test_if_else_and_ternary() {
    let mut fb = kernel_builder("branches");
    let out = fb.argument(global_ptr(BuiltinType::Int), "out");
    fb.body(|bb| {
        let lid = bb.declare_assign(uint(), "lid", get_local_id(0));
        bb.if_else(
            (&lid % 2).eq_(0),
            |bb| bb.assign(out.at(&lid), ternary(lid.lt(2), -1, 10)),
            |bb| bb.assign(out.at(&lid), &lid * 100),
        );
    });
    let program = program(fb);

    let mut memory = Memory::new();
    let out = memory.alloc_zeroed(4, BuiltinType::Int);
    Interpreter::new(&program).launch("branches", &mut memory, &[ptr(out)], range_1d(4, 4)).unwrap();
    let values: Vec<i64> = memory.lanes(out).unwrap().iter().map(|s| s.as_i64()).collect();
    assert_eq!(values, vec![-1, 100, 10, 300]);
}

#[test]
fn test_vector_init_and_swizzle() {
    let float2 = DataType::vector(BuiltinType::Float, 2);
    let mut fb = kernel_builder("vectors");
    let out = fb.argument(DataType::pointer_to(DataType::with_width(BuiltinType::Float, 2, AddrSpace::Global)), "out");
    fb.body(|bb| {
        let v = bb.declare_assign(float2.clone(), "v", init_vector(float2.clone(), [1.5f32.into(), (-2.0f32).into()]));
        bb.assign(v.s(&[1]), v.s(&[0]) * 2.0f32);
        bb.assign(out.at(0), &v);
        bb.assign(out.at(1), v.s(&[1, 0]) + 1.0f32);
        bb.assign(out.at(2), select(&v, -&v, cast(DataType::vector(BuiltinType::Int, 2), v.lt(2.0f32))));
    });
    let program = program(fb);

    let mut memory = Memory::new();
    let out = memory.alloc_floats(&[0.0; 6]);
    Interpreter::new(&program).launch("vectors", &mut memory, &[ptr(out)], range_1d(1, 1)).unwrap();
    assert_eq!(memory.floats(out).unwrap(), vec![1.5, 3.0, 4.0, 2.5, -1.5, 3.0]);
}

#[test]
fn test_host_function_call() {
    let mut fb = kernel_builder("scaled");
    let input = fb.argument(global_ptr(BuiltinType::Float), "in");
    let out = fb.argument(global_ptr(BuiltinType::Float), "out");
    fb.body(|bb| {
        let gid = bb.declare_assign(uint(), "gid", get_global_id(0));
        bb.assign(out.at(&gid), call("twice", [input.at(&gid)]));
    });
    let program = program(fb);

    let mut memory = Memory::new();
    let input = memory.alloc_floats(&[1.0, -0.25, 3.0]);
    let out = memory.alloc_floats(&[0.0; 3]);
    let mut interpreter = Interpreter::new(&program);
    interpreter.register("twice", |_, args| Ok(Value::from(args[0].scalar()?.as_f64() * 2.0)));
    interpreter.launch("scaled", &mut memory, &[ptr(input), ptr(out)], range_1d(3, 1)).unwrap();
    assert_eq!(memory.floats(out).unwrap(), vec![2.0, -0.5, 6.0]);
}

#[test]
fn test_float_stores_round_to_single_precision() {
    let mut fb = kernel_builder("third");
    let out = fb.argument(global_ptr(BuiltinType::Float), "out");
    fb.body(|bb| bb.assign(out.at(0), Expr::float(1.0, 64) / 3.0));
    let program = program(fb);

    let mut memory = Memory::new();
    let out = memory.alloc_floats(&[0.0]);
    Interpreter::new(&program).launch("third", &mut memory, &[ptr(out)], range_1d(1, 1)).unwrap();
    assert_eq!(memory.floats(out).unwrap()[0], (1.0f64 / 3.0) as f32 as f64);
}

// =============================================================================
// Sub-groups
// =============================================================================

/// Sub-groups of 4; `cur` of lane `l` is `l` and `next` is `(l + 2) % 8`.
#[test_case(1, &[1, 2, 3, 2, 5, 6, 7, 6] ; "down by one")]
#[test_case(3, &[3, 2, 3, 4, 7, 6, 7, 0] ; "down by three")]
fn test_shuffle_down_wraps_into_next(delta: u32, expected: &[u64]) {
    let mut fb = kernel_builder("shuffle");
    let out = fb.argument(global_ptr(BuiltinType::Uint), "out");
    fb.attribute(Attribute::IntelReqdSubGroupSize(4));
    fb.body(|bb| {
        let lid = bb.declare_assign(uint(), "lid", get_local_id(0));
        let next = bb.declare_assign(uint(), "next", (&lid + 2) % 8);
        bb.assign(out.at(&lid), intel_sub_group_shuffle_down(&lid, &next, delta));
    });
    let program = program(fb);

    let mut memory = Memory::new();
    let out = memory.alloc_zeroed(8, BuiltinType::Uint);
    Interpreter::new(&program).launch("shuffle", &mut memory, &[ptr(out)], range_1d(8, 8)).unwrap();
    assert_eq!(uints(&memory, out), expected);
}

#[test]
fn test_shuffle_up_reads_previous() {
    let mut fb = kernel_builder("shuffle_up");
    let out = fb.argument(global_ptr(BuiltinType::Uint), "out");
    fb.attribute(Attribute::IntelReqdSubGroupSize(4));
    fb.body(|bb| {
        let lid = bb.declare_assign(uint(), "lid", get_local_id(0));
        bb.assign(out.at(&lid), intel_sub_group_shuffle_up(&lid * 10, &lid, 1u32));
    });
    let program = program(fb);

    let mut memory = Memory::new();
    let out = memory.alloc_zeroed(8, BuiltinType::Uint);
    Interpreter::new(&program).launch("shuffle_up", &mut memory, &[ptr(out)], range_1d(8, 8)).unwrap();
    assert_eq!(uints(&memory, out), vec![30, 0, 1, 2, 70, 4, 5, 6]);
}

#[test]
fn test_shuffle_in_divergent_branch_fails() {
    let mut fb = kernel_builder("partial");
    let out = fb.argument(global_ptr(BuiltinType::Uint), "out");
    fb.attribute(Attribute::IntelReqdSubGroupSize(4));
    fb.body(|bb| {
        let lid = bb.declare_assign(uint(), "lid", get_local_id(0));
        bb.if_selection(lid.lt(2), |bb| bb.assign(out.at(&lid), intel_sub_group_shuffle_xor(&lid, 3u32)));
    });
    let program = program(fb);

    let mut memory = Memory::new();
    let out = memory.alloc_zeroed(4, BuiltinType::Uint);
    let err = Interpreter::new(&program).launch("partial", &mut memory, &[ptr(out)], range_1d(4, 4)).unwrap_err();
    assert!(matches!(err, Error::InactiveLane { item: 3 }), "{err}");
}

fn guarded_barrier(active: u32, sub_group: bool) -> Program {
    let mut fb = kernel_builder("guarded");
    let out = fb.argument(global_ptr(BuiltinType::Uint), "out");
    fb.attribute(Attribute::IntelReqdSubGroupSize(4));
    fb.body(|bb| {
        let lid = bb.declare_assign(uint(), "lid", get_local_id(0));
        bb.if_selection(lid.lt(active), |bb| {
            let fence = if sub_group { sub_group_barrier(MemFenceFlag::Local) } else { barrier(MemFenceFlag::Local) };
            bb.add(fence);
            bb.assign(out.at(&lid), 1u32);
        });
    });
    program(fb)
}

#[test_case(1, false, 1 ; "work group barrier behind lane condition")]
#[test_case(4, false, 4 ; "work group barrier in one sub group")]
#[test_case(2, true, 2 ; "sub group barrier splitting a sub group")]
fn test_divergent_barrier_fails(active: u32, sub_group: bool, missing: usize) {
    let program = guarded_barrier(active, sub_group);
    let mut memory = Memory::new();
    let out = memory.alloc_zeroed(8, BuiltinType::Uint);
    let err = Interpreter::new(&program).launch("guarded", &mut memory, &[ptr(out)], range_1d(8, 8)).unwrap_err();
    assert!(matches!(err, Error::DivergentBarrier { item, .. } if item == missing), "{err}");
}

#[test]
fn test_sub_group_barrier_on_whole_sub_group() {
    let program = guarded_barrier(4, true);
    let mut memory = Memory::new();
    let out = memory.alloc_zeroed(8, BuiltinType::Uint);
    Interpreter::new(&program).launch("guarded", &mut memory, &[ptr(out)], range_1d(8, 8)).unwrap();
    assert_eq!(uints(&memory, out), vec![1, 1, 1, 1, 0, 0, 0, 0]);
}

/// Complex FFTs of length `n` with real and imaginary parts on neighbouring sub-group lanes.
#[test_case(&[4] ; "single radix 4")]
#[test_case(&[2, 4] ; "two factors")]
#[test_case(&[3, 5] ; "odd factors")]
fn test_sub_group_butterfly(factors: &[usize]) {
    let n: usize = factors.iter().product();
    let sgs = 16;
    let transforms = sgs / 2;
    let precision = Precision::F32;

    let mut fb = kernel_builder("subgroup_fft");
    let input = fb.argument(global_ptr(BuiltinType::Float), "in");
    let out = fb.argument(global_ptr(BuiltinType::Float), "out");
    fb.attribute(Attribute::ReqdWorkGroupSize([sgs as u32, 1, 1]));
    fb.attribute(Attribute::IntelReqdSubGroupSize(sgs as u32));
    fb.body(|bb| {
        let lane = bb.declare_assign(uint(), "lane", get_sub_group_local_id());
        let is_odd = bb.declare_assign(uint(), "is_odd", &lane % 2);
        let x = bb.declare(DataType::array_of(precision.real(AddrSpace::Generic), n), "x");
        for j in 0..n {
            bb.assign(x.at(j), input.at(&lane + j * sgs));
        }
        basic_inplace_subgroup(bb, precision, -1, factors, &x, &is_odd, None);
        let unscramble = Unscrambler::new(factors);
        for k in 0..n {
            bb.assign(out.at(&lane + k * sgs), x.at(unscramble.apply(k)));
        }
    });
    let program = program(fb);

    // Element j of transform t is the complex number at lanes 2t and 2t + 1 of row j.
    let signal: Vec<Vec<Complex>> = (0..transforms)
        .map(|t| (0..n).map(|j| Complex::new((j + t) as f64 * 0.25, 1.0 - (j * t) as f64 * 0.125)).collect())
        .collect();
    let mut data = vec![0.0; n * sgs];
    for (t, x) in signal.iter().enumerate() {
        for (j, v) in x.iter().enumerate() {
            data[j * sgs + 2 * t] = v.re;
            data[j * sgs + 2 * t + 1] = v.im;
        }
    }

    let mut memory = Memory::new();
    let input = memory.alloc_floats(&data);
    let out = memory.alloc_floats(&vec![0.0; n * sgs]);
    Interpreter::new(&program)
        .launch("subgroup_fft", &mut memory, &[ptr(input), ptr(out)], range_1d(sgs, sgs))
        .unwrap();

    let result = memory.floats(out).unwrap();
    for (t, x) in signal.iter().enumerate() {
        let actual: Vec<Complex> =
            (0..n).map(|k| Complex::new(result[k * sgs + 2 * t], result[k * sgs + 2 * t + 1])).collect();
        let err = max_error(&actual, &dft(x, -1.0));
        assert!(err < 1e-4 * n as f64, "transform {t}: error {err}\n{actual:?}");
    }
}

// =============================================================================
// Launch errors
// =============================================================================

fn trivial() -> Program {
    let mut fb = kernel_builder("trivial");
    let out = fb.argument(global_ptr(BuiltinType::Uint), "out");
    fb.attribute(Attribute::ReqdWorkGroupSize([2, 1, 1]));
    fb.body(|bb| bb.assign(out.at(get_global_id(0)), 1u32));
    program(fb)
}

#[test]
fn test_unknown_kernel() {
    let program = trivial();
    let err = Interpreter::new(&program).launch("missing", &mut Memory::new(), &[], range_1d(2, 2)).unwrap_err();
    assert!(matches!(err, Error::UnknownKernel { ref name } if name == "missing"), "{err}");
}

#[test]
fn test_argument_count() {
    let program = trivial();
    let err = Interpreter::new(&program).launch("trivial", &mut Memory::new(), &[], range_1d(2, 2)).unwrap_err();
    assert!(matches!(err, Error::ArgumentCount { expected: 1, actual: 0, .. }), "{err}");
}

#[test_case(4, 4 ; "local size differs from attribute")]
#[test_case(3, 2 ; "global not a multiple of local")]
fn test_invalid_range(global: usize, local: usize) {
    let program = trivial();
    let mut memory = Memory::new();
    let out = memory.alloc_zeroed(4, BuiltinType::Uint);
    let err =
        Interpreter::new(&program).launch("trivial", &mut memory, &[ptr(out)], range_1d(global, local)).unwrap_err();
    assert!(matches!(err, Error::InvalidRange { .. }), "{err}");
}

#[test]
fn test_out_of_bounds_store() {
    let program = trivial();
    let mut memory = Memory::new();
    let out = memory.alloc_zeroed(3, BuiltinType::Uint);
    let err = Interpreter::new(&program).launch("trivial", &mut memory, &[ptr(out)], range_1d(4, 2)).unwrap_err();
    assert!(matches!(err, Error::OutOfBounds { index: 3, len: 3, .. }), "{err}");
}

#[test]
fn test_unregistered_function() {
    let mut fb = kernel_builder("calls");
    fb.body(|bb| bb.add(call("nowhere", [])));
    let program = program(fb);
    let err = Interpreter::new(&program).launch("calls", &mut Memory::new(), &[], range_1d(1, 1)).unwrap_err();
    assert!(matches!(err, Error::UnknownFunction { ref name } if name == "nowhere"), "{err}");
}

#[test]
fn test_group_allocations_are_released() {
    let mut fb = kernel_builder("scratch");
    fb.body(|bb| {
        bb.declare(DataType::array_of(DataType::local(BuiltinType::Float), 16), "shared");
        bb.declare(DataType::array_of(DataType::generic(BuiltinType::Float), 4), "private");
    });
    let program = program(fb);

    let mut memory = Memory::new();
    let kept = memory.alloc_zeroed(1, BuiltinType::Uint);
    Interpreter::new(&program).launch("scratch", &mut memory, &[], range_1d(8, 4)).unwrap();
    assert!(memory.lanes(kept).is_ok());
    assert_eq!(memory.mark(), 1);
}
