//! Buffers addressed by the interpreter.
//!
//! Every buffer is a flat list of scalar lanes. A pointer remembers the lane width and kind of
//! its pointee, so the same buffer can be viewed as `float2*` by one kernel and `float*` by
//! another, and stores are converted to the pointee kind.

use fftgen_dtype::{BuiltinType, DataType};

use crate::error::{OutOfBoundsSnafu, Result, TypeMismatchSnafu};
use crate::value::{Lanes, Scalar, Value};

/// Index of a buffer inside [`Memory`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[derive(derive_more::Display)]
#[display("#{_0}")]
pub struct BufferId(usize);

/// Typed position inside a buffer.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Pointer {
    pub buffer: BufferId,
    /// Offset in lanes.
    pub offset: isize,
    /// Lanes per element.
    pub width: usize,
    pub elem: BuiltinType,
}

impl Pointer {
    /// Untyped pointer to the start of `buffer`; binding it to a kernel argument sets the type.
    pub fn new(buffer: BufferId) -> Self {
        Self { buffer, offset: 0, width: 1, elem: BuiltinType::Uchar }
    }

    /// Pointer advanced by `elements` elements of the pointee.
    pub fn offset_by(self, elements: i64) -> Self {
        Self { offset: self.offset + elements as isize * self.width as isize, ..self }
    }

    /// Same address viewed as a pointer to `pointee`.
    pub fn retyped(self, pointee: &DataType) -> Self {
        match pointee {
            DataType::Scalar { ty, .. } | DataType::Vector { ty, .. } => {
                Self { width: pointee.width(), elem: *ty, ..self }
            }
            DataType::Array { of, .. } => self.retyped(of),
            DataType::Pointer { .. } => self,
        }
    }
}

/// Lane storage of every buffer visible to a launch.
#[derive(Debug, Default)]
pub struct Memory {
    buffers: Vec<Vec<Scalar>>,
}

impl Memory {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn alloc(&mut self, lanes: Vec<Scalar>) -> BufferId {
        self.buffers.push(lanes);
        BufferId(self.buffers.len() - 1)
    }

    pub fn alloc_zeroed(&mut self, lanes: usize, elem: BuiltinType) -> BufferId {
        self.alloc(vec![Scalar::zero(elem); lanes])
    }

    /// Buffer of floating-point lanes, e.g. interleaved complex numbers.
    pub fn alloc_floats(&mut self, data: &[f64]) -> BufferId {
        self.alloc(data.iter().map(|&v| Scalar::Float(v)).collect())
    }

    pub fn lanes(&self, id: BufferId) -> Result<&[Scalar]> {
        match self.buffers.get(id.0) {
            Some(buffer) => Ok(buffer),
            None => OutOfBoundsSnafu { buffer: id, index: 0isize, len: 0usize }.fail(),
        }
    }

    /// Buffer contents as floating-point numbers.
    pub fn floats(&self, id: BufferId) -> Result<Vec<f64>> {
        Ok(self.lanes(id)?.iter().map(|s| s.as_f64()).collect())
    }

    /// Element at `ptr`; a scalar for one-lane pointees.
    pub fn read(&self, ptr: Pointer) -> Result<Value> {
        let buffer = self.lanes(ptr.buffer)?;
        let range = Self::range(ptr, buffer.len())?;
        Ok(Value::from_lanes(buffer[range].iter().copied().collect()))
    }

    /// Stores `value` at `ptr`, converted to the pointee kind. Scalars fill every lane.
    pub fn write(&mut self, ptr: Pointer, value: &Value) -> Result<()> {
        let src = value.lanes()?;
        if src.len() != 1 && src.len() != ptr.width {
            return TypeMismatchSnafu { reason: format!("storing {} lanes through a {}-lane pointer", src.len(), ptr.width) }
                .fail();
        }
        let converted: Lanes = src.iter().map(|s| s.convert(ptr.elem).unwrap_or(*s)).collect();
        let len = self.lanes(ptr.buffer)?.len();
        let range = Self::range(ptr, len)?;
        let buffer = &mut self.buffers[ptr.buffer.0];
        for (i, lane) in buffer[range].iter_mut().enumerate() {
            *lane = converted[if converted.len() == 1 { 0 } else { i }];
        }
        Ok(())
    }

    fn range(ptr: Pointer, len: usize) -> Result<std::ops::Range<usize>> {
        let end = ptr.offset + ptr.width as isize;
        if ptr.offset < 0 || end > len as isize {
            let index = if ptr.offset < 0 { ptr.offset } else { end - 1 };
            return OutOfBoundsSnafu { buffer: ptr.buffer, index, len }.fail();
        }
        Ok(ptr.offset as usize..end as usize)
    }

    /// Number of buffers allocated so far; see [`Memory::release`].
    pub(crate) fn mark(&self) -> usize {
        self.buffers.len()
    }

    /// Frees every buffer allocated after `mark` was taken.
    pub(crate) fn release(&mut self, mark: usize) {
        self.buffers.truncate(mark);
    }
}
