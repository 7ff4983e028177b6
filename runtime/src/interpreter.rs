//! Host interpreter for kernel programs.
//!
//! Work-groups run one after another. Inside a group all work-items advance through the kernel
//! body together: every active work-item finishes a statement before any of them starts the
//! next one. A divergent condition splits the active set and the two sides run one after the
//! other. A barrier reached by all work-items it synchronizes is therefore already satisfied;
//! one reached on a divergent path is an error. Sub-group shuffles read the operands their
//! neighbours computed for the same expression.
//!
//! Local arrays are allocated once per work-group, private arrays once per work-item and
//! declaration; both are freed when the group finishes.

use std::collections::HashMap;
use std::rc::Rc;

use fftgen_dtype::{AddrSpace, DataType};
use fftgen_ir::{
    Attribute, BinaryOp, Block, BuiltinFunction, Expr, ExprNode, Program, Stmt, Swizzle, UnaryOp, Var,
};
use smallvec::SmallVec;
use snafu::{OptionExt, ensure};
use tracing::{debug, trace};

use crate::error::{
    ArgumentCountSnafu, DivergentBarrierSnafu, InactiveLaneSnafu, InvalidRangeSnafu, Result, TypeMismatchSnafu,
    UnknownFunctionSnafu, UnknownKernelSnafu, UnknownVariableSnafu, UnsupportedBuiltinSnafu,
    UnsupportedExpressionSnafu,
};
use crate::memory::{Memory, Pointer};
use crate::value::{Lanes, Scalar, Value};

/// Host implementation of an external function, e.g. a load or store callback.
///
/// Receives the memory of the launch and the evaluated arguments of one work-item.
pub type HostFunction = Rc<dyn Fn(&mut Memory, &[Value]) -> Result<Value>>;

/// Global and local work sizes of a launch.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct NdRange {
    pub global: [usize; 3],
    pub local: [usize; 3],
}

impl NdRange {
    pub fn new(global: [usize; 3], local: [usize; 3]) -> Self {
        Self { global, local }
    }

    /// Work-groups per dimension.
    pub fn groups(&self) -> [usize; 3] {
        std::array::from_fn(|d| self.global[d] / self.local[d].max(1))
    }

    fn validate(&self) -> Result<()> {
        for d in 0..3 {
            ensure!(self.local[d] > 0, InvalidRangeSnafu { reason: format!("local size is zero in dimension {d}") });
            ensure!(
                self.global[d] % self.local[d] == 0,
                InvalidRangeSnafu {
                    reason: format!("global size {} is not a multiple of local size {}", self.global[d], self.local[d])
                }
            );
        }
        Ok(())
    }
}

/// Executes the kernels of one program.
pub struct Interpreter<'p> {
    program: &'p Program,
    functions: HashMap<String, HostFunction>,
}

impl<'p> Interpreter<'p> {
    pub fn new(program: &'p Program) -> Self {
        Self { program, functions: HashMap::new() }
    }

    /// Makes `function` callable from kernels under `name`.
    pub fn register(
        &mut self,
        name: impl Into<String>,
        function: impl Fn(&mut Memory, &[Value]) -> Result<Value> + 'static,
    ) -> &mut Self {
        self.functions.insert(name.into(), Rc::new(function));
        self
    }

    pub fn with_functions(mut self, functions: impl IntoIterator<Item = (String, HostFunction)>) -> Self {
        self.functions.extend(functions);
        self
    }

    /// Names of the kernels in the program.
    pub fn kernels(&self) -> Vec<&str> {
        self.program.kernels().filter_map(|d| d.prototype()).map(|p| p.name.as_str()).collect()
    }

    /// Runs kernel `name` over `range`.
    ///
    /// `args` are converted to the declared parameter types; pointers take the element type of
    /// the parameter they are bound to.
    #[tracing::instrument(skip_all, fields(kernel = name))]
    pub fn launch(&self, name: &str, memory: &mut Memory, args: &[Value], range: NdRange) -> Result<()> {
        let (prototype, body) =
            self.program.function(name).filter(|(p, _)| p.is_kernel()).context(UnknownKernelSnafu { name })?;
        ensure!(
            args.len() == prototype.args.len(),
            ArgumentCountSnafu { kernel: name, expected: prototype.args.len(), actual: args.len() }
        );
        range.validate()?;

        let mut sub_group_size = 1;
        for attribute in &prototype.attributes {
            match attribute {
                Attribute::ReqdWorkGroupSize(size) => {
                    let size = size.map(|s| s as usize);
                    ensure!(
                        size == range.local,
                        InvalidRangeSnafu {
                            reason: format!("local size {:?} differs from the required {:?}", range.local, size)
                        }
                    );
                }
                Attribute::IntelReqdSubGroupSize(size) => sub_group_size = (*size as usize).max(1),
                _ => {}
            }
        }

        let mut bound = Vec::with_capacity(args.len());
        for ((ty, var), value) in prototype.args.iter().zip(args) {
            bound.push((var.id(), ty.clone(), value.clone().convert(ty)?));
        }

        let groups = range.groups();
        debug!(?groups, local = ?range.local, sub_group_size, "launching kernel");
        for gz in 0..groups[2] {
            for gy in 0..groups[1] {
                for gx in 0..groups[0] {
                    let mark = memory.mark();
                    {
                        let mut group = Group::new(&self.functions, memory, range, [gx, gy, gz], sub_group_size, &bound);
                        let lanes: Vec<usize> = (0..group.items.len()).collect();
                        group.exec_block(body, &lanes)?;
                    }
                    memory.release(mark);
                    trace!(group = ?[gx, gy, gz], "work-group finished");
                }
            }
        }
        Ok(())
    }
}

// =============================================================================
// Work-group execution
// =============================================================================

struct WorkItem {
    local_id: [usize; 3],
    env: HashMap<u64, Value>,
}

/// Assignable location.
#[derive(Debug, Clone)]
enum Place {
    Var(Var),
    Memory(Pointer),
    Lanes(Box<Place>, SmallVec<[usize; 4]>),
}

struct Group<'a> {
    functions: &'a HashMap<String, HostFunction>,
    memory: &'a mut Memory,
    range: NdRange,
    group_id: [usize; 3],
    sub_group_size: usize,
    /// Work-items in linear local id order.
    items: Vec<WorkItem>,
    /// Declared type of every variable seen so far.
    types: HashMap<u64, DataType>,
    /// Local arrays of this group.
    shared: HashMap<u64, Value>,
}

impl<'a> Group<'a> {
    fn new(
        functions: &'a HashMap<String, HostFunction>,
        memory: &'a mut Memory,
        range: NdRange,
        group_id: [usize; 3],
        sub_group_size: usize,
        bound: &[(u64, DataType, Value)],
    ) -> Self {
        let env: HashMap<u64, Value> = bound.iter().map(|(id, _, value)| (*id, value.clone())).collect();
        let types = bound.iter().map(|(id, ty, _)| (*id, ty.clone())).collect();
        let [lx, ly, lz] = range.local;
        let mut items = Vec::with_capacity(lx * ly * lz);
        for z in 0..lz {
            for y in 0..ly {
                for x in 0..lx {
                    items.push(WorkItem { local_id: [x, y, z], env: env.clone() });
                }
            }
        }
        Self { functions, memory, range, group_id, sub_group_size, items, types, shared: HashMap::new() }
    }

    // =========================================================================
    // Statements
    // =========================================================================

    fn exec_block(&mut self, block: &Block, lanes: &[usize]) -> Result<()> {
        for stmt in &block.stmts {
            self.exec_stmt(stmt, lanes)?;
        }
        Ok(())
    }

    fn exec_stmt(&mut self, stmt: &Stmt, lanes: &[usize]) -> Result<()> {
        if lanes.is_empty() {
            return Ok(());
        }
        match stmt {
            Stmt::Declaration { ty, var, .. } => self.declare(ty, var, lanes),
            Stmt::DeclarationAssignment { ty, var, rhs, .. } => {
                let values = self.eval(rhs, lanes)?;
                self.types.insert(var.id(), ty.clone());
                for (&lane, value) in lanes.iter().zip(values) {
                    self.items[lane].env.insert(var.id(), value.convert(ty)?);
                }
                Ok(())
            }
            Stmt::Expression(expr) => self.eval(expr, lanes).map(drop),
            Stmt::Block(block) => self.exec_block(block, lanes),
            Stmt::ForLoop { start, condition, step, body, .. } => {
                self.exec_stmt(start, lanes)?;
                let mut running = self.partition(condition, lanes)?.0;
                while !running.is_empty() {
                    self.exec_block(body, &running)?;
                    self.eval(step, &running)?;
                    running = self.partition(condition, &running)?.0;
                }
                Ok(())
            }
            Stmt::IfSelection { condition, then, otherwise } => {
                let (yes, no) = self.partition(condition, lanes)?;
                self.exec_block(then, &yes)?;
                match otherwise {
                    Some(otherwise) => self.exec_stmt(otherwise, &no),
                    None => Ok(()),
                }
            }
        }
    }

    fn declare(&mut self, ty: &DataType, var: &Var, lanes: &[usize]) -> Result<()> {
        self.types.insert(var.id(), ty.clone());
        match ty {
            DataType::Array { of, size } if ty.space() == AddrSpace::Local => {
                let value = match self.shared.get(&var.id()) {
                    Some(value) => value.clone(),
                    None => {
                        let value = self.alloc_array(of, *size);
                        self.shared.insert(var.id(), value.clone());
                        value
                    }
                };
                for &lane in lanes {
                    self.items[lane].env.insert(var.id(), value.clone());
                }
            }
            DataType::Array { of, size } => {
                for &lane in lanes {
                    let value = self.alloc_array(of, *size);
                    self.items[lane].env.insert(var.id(), value);
                }
            }
            _ => {
                let zero = zero_of(ty);
                for &lane in lanes {
                    self.items[lane].env.insert(var.id(), zero.clone());
                }
            }
        }
        Ok(())
    }

    fn alloc_array(&mut self, of: &DataType, size: usize) -> Value {
        let id = self.memory.alloc_zeroed(size * lanes_of(of), of.builtin());
        Value::Pointer(Pointer::new(id).retyped(of))
    }

    /// Splits `lanes` by the truth of `condition`, keeping the order.
    fn partition(&mut self, condition: &Expr, lanes: &[usize]) -> Result<(Vec<usize>, Vec<usize>)> {
        let values = self.eval(condition, lanes)?;
        let mut yes = Vec::with_capacity(lanes.len());
        let mut no = Vec::new();
        for (&lane, value) in lanes.iter().zip(&values) {
            if value.is_true()? {
                yes.push(lane);
            } else {
                no.push(lane);
            }
        }
        Ok((yes, no))
    }

    // =========================================================================
    // Expressions
    // =========================================================================

    /// Value of `expr` for every lane, in the order of `lanes`.
    fn eval(&mut self, expr: &Expr, lanes: &[usize]) -> Result<Vec<Value>> {
        let n = lanes.len();
        match expr.node() {
            ExprNode::Var(var) => lanes.iter().map(|&lane| self.lookup(lane, var)).collect(),
            ExprNode::Int { value, .. } => Ok(vec![Value::from(*value); n]),
            ExprNode::UInt { value, .. } => Ok(vec![Value::from(*value); n]),
            ExprNode::Float { value, bits } => {
                let value = if *bits == 32 { *value as f32 as f64 } else { *value };
                Ok(vec![Value::from(value); n])
            }
            ExprNode::MemFence(_) | ExprNode::MemoryScope(_) | ExprNode::MemoryOrder(_) => Ok(vec![Value::Void; n]),
            ExprNode::Str(_) => UnsupportedExpressionSnafu { reason: "string literal" }.fail(),
            ExprNode::Unary { op, term } => self.unary(*op, term, lanes),
            ExprNode::Binary { op, lhs, rhs } => self.binary(*op, lhs, rhs, lanes),
            ExprNode::Ternary { condition, then, otherwise } => {
                let (yes, no) = self.partition(condition, lanes)?;
                let taken = self.eval(then, &yes)?;
                let other = self.eval(otherwise, &no)?;
                Ok(merge(lanes, &yes, taken, other))
            }
            ExprNode::Access { .. } => {
                let places = self.places(expr, lanes)?;
                lanes.iter().zip(&places).map(|(&lane, place)| self.read(lane, place)).collect()
            }
            ExprNode::CallBuiltin { function, args } => self.builtin(*function, args, lanes),
            ExprNode::Call { name, args } => self.call(name, args, lanes),
            ExprNode::Cast { ty, term } => self.cast(ty, term, lanes),
            ExprNode::Swizzle { selector, term } => self
                .eval(term, lanes)?
                .iter()
                .map(|value| {
                    let src = value.lanes()?;
                    let picked = swizzle_lanes(selector, src.len())?;
                    Ok(Value::from_lanes(picked.iter().map(|&i| src[i]).collect()))
                })
                .collect(),
        }
    }

    fn lookup(&self, lane: usize, var: &Var) -> Result<Value> {
        self.items[lane].env.get(&var.id()).cloned().context(UnknownVariableSnafu { name: var.name() })
    }

    fn unary(&mut self, op: UnaryOp, term: &Expr, lanes: &[usize]) -> Result<Vec<Value>> {
        match op {
            UnaryOp::Minus => self.eval(term, lanes)?.iter().map(|v| v.map(|s| Ok(s.negate()))).collect(),
            UnaryOp::BitwiseNot => self.eval(term, lanes)?.iter().map(|v| v.map(Scalar::bit_not)).collect(),
            UnaryOp::LogicalNot => {
                self.eval(term, lanes)?.iter().map(|v| Ok(Value::from(!v.is_true()? as i64))).collect()
            }
            UnaryOp::Dereference => {
                let pointers = self.eval(term, lanes)?;
                pointers.iter().map(|p| self.memory.read(p.pointer()?)).collect()
            }
            UnaryOp::AddressOf => self
                .places(term, lanes)?
                .into_iter()
                .map(|place| match place {
                    Place::Memory(ptr) => Ok(Value::Pointer(ptr)),
                    other => UnsupportedExpressionSnafu { reason: format!("address of {other:?}") }.fail(),
                })
                .collect(),
            UnaryOp::PreIncrement | UnaryOp::PreDecrement | UnaryOp::PostIncrement | UnaryOp::PostDecrement => {
                let delta = Value::from(if matches!(op, UnaryOp::PreIncrement | UnaryOp::PostIncrement) {
                    1i64
                } else {
                    -1
                });
                let post = matches!(op, UnaryOp::PostIncrement | UnaryOp::PostDecrement);
                let places = self.places(term, lanes)?;
                lanes
                    .iter()
                    .zip(places)
                    .map(|(&lane, place)| {
                        let old = self.read(lane, &place)?;
                        let new = self.write(lane, &place, Value::arith(BinaryOp::Add, &old, &delta)?)?;
                        Ok(if post { old } else { new })
                    })
                    .collect()
            }
        }
    }

    fn binary(&mut self, op: BinaryOp, lhs: &Expr, rhs: &Expr, lanes: &[usize]) -> Result<Vec<Value>> {
        use BinaryOp::*;
        match op {
            LogicalAnd | LogicalOr => {
                let (yes, no) = self.partition(lhs, lanes)?;
                let (pending, decided) = if op == LogicalAnd { (yes, no) } else { (no, yes) };
                let pending_values = self
                    .eval(rhs, &pending)?
                    .iter()
                    .map(|v| Ok(Value::from(v.is_true()? as i64)))
                    .collect::<Result<Vec<_>>>()?;
                let decided_values = vec![Value::from((op == LogicalOr) as i64); decided.len()];
                Ok(merge(lanes, &pending, pending_values, decided_values))
            }
            Comma => {
                self.eval(lhs, lanes)?;
                self.eval(rhs, lanes)
            }
            Assignment => {
                let values = self.eval(rhs, lanes)?;
                let places = self.places(lhs, lanes)?;
                lanes
                    .iter()
                    .zip(places)
                    .zip(values)
                    .map(|((&lane, place), value)| self.write(lane, &place, value))
                    .collect()
            }
            Less | LessEqual | Greater | GreaterEqual | Equal | NotEqual => {
                let a = self.eval(lhs, lanes)?;
                let b = self.eval(rhs, lanes)?;
                a.iter().zip(&b).map(|(x, y)| Value::compare(op, x, y)).collect()
            }
            _ => match compound_operator(op) {
                Some(base) => {
                    let values = self.eval(rhs, lanes)?;
                    let places = self.places(lhs, lanes)?;
                    lanes
                        .iter()
                        .zip(places)
                        .zip(values)
                        .map(|((&lane, place), value)| {
                            let old = self.read(lane, &place)?;
                            self.write(lane, &place, Value::arith(base, &old, &value)?)
                        })
                        .collect()
                }
                None => {
                    let a = self.eval(lhs, lanes)?;
                    let b = self.eval(rhs, lanes)?;
                    a.iter().zip(&b).map(|(x, y)| Value::arith(op, x, y)).collect()
                }
            },
        }
    }

    fn cast(&mut self, ty: &DataType, term: &Expr, lanes: &[usize]) -> Result<Vec<Value>> {
        let init_list = matches!(ty, DataType::Vector { .. })
            && matches!(term.node(), ExprNode::Binary { op: BinaryOp::Comma, .. });
        if !init_list {
            return self.eval(term, lanes)?.into_iter().map(|v| v.convert(ty)).collect();
        }
        let mut elements = Vec::new();
        flatten_comma(term, &mut elements);
        let columns = elements.iter().map(|e| self.eval(e, lanes)).collect::<Result<Vec<_>>>()?;
        (0..lanes.len())
            .map(|pos| {
                let mut joined = Lanes::new();
                for column in &columns {
                    joined.extend_from_slice(column[pos].lanes()?);
                }
                Value::Vector(joined).convert(ty)
            })
            .collect()
    }

    fn call(&mut self, name: &str, args: &[Expr], lanes: &[usize]) -> Result<Vec<Value>> {
        let function = self.functions.get(name).cloned().context(UnknownFunctionSnafu { name })?;
        let columns = args.iter().map(|a| self.eval(a, lanes)).collect::<Result<Vec<_>>>()?;
        (0..lanes.len())
            .map(|pos| {
                let row: SmallVec<[Value; 4]> = columns.iter().map(|c| c[pos].clone()).collect();
                function(&mut *self.memory, &row)
            })
            .collect()
    }

    // =========================================================================
    // Places
    // =========================================================================

    fn places(&mut self, expr: &Expr, lanes: &[usize]) -> Result<Vec<Place>> {
        match expr.node() {
            ExprNode::Var(var) => Ok(vec![Place::Var(var.clone()); lanes.len()]),
            ExprNode::Access { field, address } => {
                let bases = self.eval(field, lanes)?;
                let offsets = self.eval(address, lanes)?;
                bases
                    .iter()
                    .zip(&offsets)
                    .map(|(base, offset)| Ok(Place::Memory(base.pointer()?.offset_by(offset.index()?))))
                    .collect()
            }
            ExprNode::Unary { op: UnaryOp::Dereference, term } => {
                self.eval(term, lanes)?.iter().map(|p| Ok(Place::Memory(p.pointer()?))).collect()
            }
            ExprNode::Swizzle { selector, term } => {
                let bases = self.places(term, lanes)?;
                lanes
                    .iter()
                    .zip(bases)
                    .map(|(&lane, base)| {
                        let width = self.read(lane, &base)?.lanes()?.len();
                        Ok(Place::Lanes(Box::new(base), swizzle_lanes(selector, width)?))
                    })
                    .collect()
            }
            _ => UnsupportedExpressionSnafu { reason: format!("{expr:?} is not assignable") }.fail(),
        }
    }

    fn read(&self, lane: usize, place: &Place) -> Result<Value> {
        match place {
            Place::Var(var) => self.lookup(lane, var),
            Place::Memory(ptr) => self.memory.read(*ptr),
            Place::Lanes(base, picked) => {
                let value = self.read(lane, base)?;
                let src = value.lanes()?;
                Ok(Value::from_lanes(picked.iter().map(|&i| src[i]).collect()))
            }
        }
    }

    /// Stores `value`, converted to the type of the place, and returns what was stored.
    fn write(&mut self, lane: usize, place: &Place, value: Value) -> Result<Value> {
        match place {
            Place::Var(var) => {
                let value = match self.types.get(&var.id()) {
                    Some(ty) => value.convert(ty)?,
                    None => value,
                };
                let slot =
                    self.items[lane].env.get_mut(&var.id()).context(UnknownVariableSnafu { name: var.name() })?;
                *slot = value.clone();
                Ok(value)
            }
            Place::Memory(ptr) => {
                self.memory.write(*ptr, &value)?;
                Ok(value)
            }
            Place::Lanes(base, picked) => {
                let current = self.read(lane, base)?;
                let mut lanes: Lanes = current.lanes()?.iter().copied().collect();
                let src = value.lanes()?;
                ensure!(
                    src.len() == 1 || src.len() == picked.len(),
                    TypeMismatchSnafu { reason: format!("assigning {} lanes to {} lanes", src.len(), picked.len()) }
                );
                for (k, &i) in picked.iter().enumerate() {
                    lanes[i] = src[if src.len() == 1 { 0 } else { k }];
                }
                self.write(lane, base, Value::from_lanes(lanes))?;
                Ok(value)
            }
        }
    }

    // =========================================================================
    // Builtins
    // =========================================================================

    fn builtin(&mut self, function: BuiltinFunction, args: &[Expr], lanes: &[usize]) -> Result<Vec<Value>> {
        use BuiltinFunction as B;
        let columns = args.iter().map(|a| self.eval(a, lanes)).collect::<Result<Vec<_>>>()?;
        let column = |i: usize| -> Result<&[Value]> {
            columns.get(i).map(Vec::as_slice).context(TypeMismatchSnafu {
                reason: format!("{} expects at least {} arguments", function.name(), i + 1),
            })
        };
        let n = lanes.len();
        let items = self.items.len();
        let sgs = self.sub_group_size;

        match function {
            B::Barrier | B::WorkGroupBarrier | B::SubGroupBarrier => {
                self.barrier(function, lanes)?;
                Ok(vec![Value::Void; n])
            }
            B::GetWorkDim => Ok(vec![Value::from(self.work_dim()); n]),
            B::GetGlobalId
            | B::GetLocalId
            | B::GetGroupId
            | B::GetLocalSize
            | B::GetEnqueuedLocalSize
            | B::GetGlobalSize
            | B::GetNumGroups
            | B::GetGlobalOffset => lanes
                .iter()
                .zip(column(0)?)
                .map(|(&lane, dim)| Ok(Value::from(self.work_item_query(function, lane, dim.index()?))))
                .collect(),
            B::GetLocalLinearId => Ok(lanes.iter().map(|&lane| Value::from(lane)).collect()),
            B::GetGlobalLinearId => Ok(lanes.iter().map(|&lane| Value::from(self.global_linear_id(lane))).collect()),
            B::GetSubGroupSize | B::GetMaxSubGroupSize => Ok(vec![Value::from(sgs); n]),
            B::GetNumSubGroups | B::GetEnqueuedNumSubGroups => Ok(vec![Value::from(items.div_ceil(sgs)); n]),
            B::GetSubGroupId => Ok(lanes.iter().map(|&lane| Value::from(lane / sgs)).collect()),
            B::GetSubGroupLocalId => Ok(lanes.iter().map(|&lane| Value::from(lane % sgs)).collect()),
            B::Select => {
                let (a, b, c) = (column(0)?, column(1)?, column(2)?);
                (0..n).map(|pos| select(&a[pos], &b[pos], &c[pos])).collect()
            }
            B::Min | B::Fmin | B::Max | B::Fmax => {
                let keep = if matches!(function, B::Min | B::Fmin) { BinaryOp::Less } else { BinaryOp::Greater };
                let (a, b) = (column(0)?, column(1)?);
                a.iter()
                    .zip(b)
                    .map(|(x, y)| x.zip_with(y, |x, y| Ok(if Scalar::compare(keep, x, y)? { x } else { y })))
                    .collect()
            }
            B::Mad | B::Fma => {
                let (a, b, c) = (column(0)?, column(1)?, column(2)?);
                (0..n)
                    .map(|pos| {
                        let product = Value::arith(BinaryOp::Multiply, &a[pos], &b[pos])?;
                        Value::arith(BinaryOp::Add, &product, &c[pos])
                    })
                    .collect()
            }
            B::Sqrt | B::NativeSqrt | B::HalfSqrt => float_map(column(0)?, f64::sqrt),
            B::Rsqrt | B::NativeRsqrt | B::HalfRsqrt => float_map(column(0)?, |x| 1.0 / x.sqrt()),
            B::Sin | B::NativeSin | B::HalfSin => float_map(column(0)?, f64::sin),
            B::Cos | B::NativeCos | B::HalfCos => float_map(column(0)?, f64::cos),
            B::Exp | B::NativeExp | B::HalfExp => float_map(column(0)?, f64::exp),
            B::Log | B::NativeLog | B::HalfLog => float_map(column(0)?, f64::ln),
            B::Fabs => float_map(column(0)?, f64::abs),
            B::Floor => float_map(column(0)?, f64::floor),
            B::Ceil => float_map(column(0)?, f64::ceil),
            B::Trunc => float_map(column(0)?, f64::trunc),
            B::Round => float_map(column(0)?, f64::round),
            B::IntelSubGroupShuffle
            | B::IntelSubGroupShuffleXor
            | B::IntelSubGroupShuffleDown
            | B::IntelSubGroupShuffleUp => self.shuffle(function, &columns, lanes),
            other => UnsupportedBuiltinSnafu { name: other.name() }.fail(),
        }
    }

    fn work_dim(&self) -> usize {
        match self.range.global {
            [_, 1, 1] => 1,
            [_, _, 1] => 2,
            _ => 3,
        }
    }

    fn work_item_query(&self, function: BuiltinFunction, lane: usize, dim: i64) -> usize {
        use BuiltinFunction as B;
        let Some(d) = usize::try_from(dim).ok().filter(|&d| d < 3) else {
            return match function {
                B::GetLocalSize | B::GetEnqueuedLocalSize | B::GetGlobalSize | B::GetNumGroups => 1,
                _ => 0,
            };
        };
        let local_id = self.items[lane].local_id[d];
        match function {
            B::GetGlobalId => self.group_id[d] * self.range.local[d] + local_id,
            B::GetLocalId => local_id,
            B::GetGroupId => self.group_id[d],
            B::GetLocalSize | B::GetEnqueuedLocalSize => self.range.local[d],
            B::GetGlobalSize => self.range.global[d],
            B::GetNumGroups => self.range.global[d] / self.range.local[d],
            _ => 0,
        }
    }

    fn global_linear_id(&self, lane: usize) -> usize {
        let id: [usize; 3] = std::array::from_fn(|d| self.group_id[d] * self.range.local[d] + self.items[lane].local_id[d]);
        let [gx, gy, _] = self.range.global;
        id[0] + gx * (id[1] + gy * id[2])
    }

    /// Work-group barriers need every work-item of the group, sub-group barriers every
    /// work-item of each sub-group that reaches them.
    fn barrier(&self, function: BuiltinFunction, lanes: &[usize]) -> Result<()> {
        let items = self.items.len();
        let mut active = vec![false; items];
        for &lane in lanes {
            active[lane] = true;
        }
        let missing = match function {
            BuiltinFunction::SubGroupBarrier => {
                let sgs = self.sub_group_size;
                lanes.iter().find_map(|&lane| {
                    let first = lane / sgs * sgs;
                    (first..(first + sgs).min(items)).find(|&item| !active[item])
                })
            }
            _ => (0..items).find(|&item| !active[item]),
        };
        match missing {
            Some(item) => DivergentBarrierSnafu { name: function.name(), item }.fail(),
            None => Ok(()),
        }
    }

    /// Intel sub-group shuffles; sub-groups are consecutive runs of linear local ids.
    fn shuffle(&self, function: BuiltinFunction, columns: &[Vec<Value>], lanes: &[usize]) -> Result<Vec<Value>> {
        use BuiltinFunction as B;
        let sgs = self.sub_group_size;
        let mut position = vec![None; self.items.len()];
        for (pos, &lane) in lanes.iter().enumerate() {
            position[lane] = Some(pos);
        }
        let fetch = |column: usize, item: usize| -> Result<Value> {
            let pos = position.get(item).copied().flatten().context(InactiveLaneSnafu { item })?;
            columns
                .get(column)
                .map(|c| c[pos].clone())
                .context(TypeMismatchSnafu { reason: format!("{} is missing operands", function.name()) })
        };
        let operand = |column: usize, pos: usize| -> Result<isize> {
            let value = columns
                .get(column)
                .map(|c| &c[pos])
                .context(TypeMismatchSnafu { reason: format!("{} is missing operands", function.name()) })?;
            Ok(value.index()? as isize)
        };
        let width = sgs as isize;

        lanes
            .iter()
            .enumerate()
            .map(|(pos, &lane)| {
                let s = (lane % sgs) as isize;
                let base = lane - lane % sgs;
                let (column, src) = match function {
                    B::IntelSubGroupShuffle => (0, operand(1, pos)?),
                    B::IntelSubGroupShuffleXor => (0, s ^ operand(1, pos)?),
                    B::IntelSubGroupShuffleDown => match s + operand(2, pos)? {
                        src if src < width => (0, src),
                        src => (1, src - width),
                    },
                    _ => match s - operand(2, pos)? {
                        src if src >= 0 => (1, src),
                        src => (0, src + width),
                    },
                };
                ensure!(
                    (0..width).contains(&src),
                    TypeMismatchSnafu { reason: format!("{} reads lane {src} of a {sgs}-lane sub-group", function.name()) }
                );
                fetch(column, base + src as usize)
            })
            .collect()
    }
}

// =============================================================================
// Helpers
// =============================================================================

/// Interleaves the results of two disjoint, order-preserving subsets of `lanes`.
fn merge(lanes: &[usize], taken_lanes: &[usize], taken: Vec<Value>, other: Vec<Value>) -> Vec<Value> {
    let mut taken_lanes = taken_lanes.iter().peekable();
    let mut taken = taken.into_iter();
    let mut other = other.into_iter();
    lanes
        .iter()
        .filter_map(|lane| {
            if taken_lanes.peek() == Some(&lane) {
                taken_lanes.next();
                taken.next()
            } else {
                other.next()
            }
        })
        .collect()
}

fn flatten_comma(expr: &Expr, out: &mut Vec<Expr>) {
    match expr.node() {
        ExprNode::Binary { op: BinaryOp::Comma, lhs, rhs } => {
            flatten_comma(lhs, out);
            flatten_comma(rhs, out);
        }
        _ => out.push(expr.clone()),
    }
}

fn compound_operator(op: BinaryOp) -> Option<BinaryOp> {
    use BinaryOp::*;
    Some(match op {
        AddAssign => Add,
        SubtractAssign => Subtract,
        MultiplyAssign => Multiply,
        DivideAssign => Divide,
        ModuloAssign => Modulo,
        LeftShiftAssign => LeftShift,
        RightShiftAssign => RightShift,
        BitwiseAndAssign => BitwiseAnd,
        BitwiseOrAssign => BitwiseOr,
        BitwiseXorAssign => BitwiseXor,
        _ => return None,
    })
}

fn swizzle_lanes(selector: &Swizzle, width: usize) -> Result<SmallVec<[usize; 4]>> {
    let picked: SmallVec<[usize; 4]> = match selector {
        Swizzle::Lanes(lanes) => lanes.iter().map(|&l| l as usize).collect(),
        Swizzle::Lo => (0..width.div_ceil(2)).collect(),
        Swizzle::Hi => (width / 2..width).collect(),
        Swizzle::Even => (0..width).step_by(2).collect(),
        Swizzle::Odd => (1..width).step_by(2).collect(),
    };
    ensure!(
        picked.iter().all(|&l| l < width),
        TypeMismatchSnafu { reason: format!("swizzle {selector:?} on a {width}-lane value") }
    );
    Ok(picked)
}

/// `c ? b : a`; vector conditions pick per lane by their sign bit.
fn select(a: &Value, b: &Value, c: &Value) -> Result<Value> {
    if let Value::Scalar(c) = c {
        return Ok(if c.is_true() { b.clone() } else { a.clone() });
    }
    let (al, bl, cl) = (a.lanes()?, b.lanes()?, c.lanes()?);
    let lane = |v: &[Scalar], i: usize| if v.len() == 1 { v[0] } else { v[i] };
    ensure!(
        al.len() <= cl.len() && bl.len() <= cl.len(),
        TypeMismatchSnafu { reason: "select operands wider than the condition" }
    );
    Ok(Value::Vector(
        (0..cl.len())
            .map(|i| {
                let negative = match cl[i] {
                    Scalar::Int(v) => v < 0,
                    Scalar::UInt(v) => v >> 63 == 1,
                    Scalar::Float(v) => v.is_sign_negative(),
                };
                if negative { lane(bl, i) } else { lane(al, i) }
            })
            .collect(),
    ))
}

fn float_map(values: &[Value], f: impl Fn(f64) -> f64) -> Result<Vec<Value>> {
    values.iter().map(|v| v.map(|s| Ok(Scalar::Float(f(s.as_f64()))))).collect()
}

fn zero_of(ty: &DataType) -> Value {
    match ty {
        DataType::Scalar { ty, .. } => Value::Scalar(Scalar::zero(*ty)),
        DataType::Vector { ty, width, .. } => {
            Value::Vector(std::iter::repeat_n(Scalar::zero(*ty), *width as usize).collect())
        }
        DataType::Pointer { .. } | DataType::Array { .. } => Value::Void,
    }
}

/// Scalar lanes of one value of `ty`.
fn lanes_of(ty: &DataType) -> usize {
    match ty {
        DataType::Array { of, size } => size * lanes_of(of),
        other => other.width(),
    }
}
