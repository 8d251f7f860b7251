use crate::token::Token;
use indexmap::IndexMap;
use std::collections::HashMap;

/// Size of the data memory handed out by `malloc`.
pub const MEMORY_SIZE: usize = 256;
/// Allocations reaching into the last `MEMORY_RESERVE` units are reported.
pub const MEMORY_RESERVE: usize = 16;

/// State shared by every macro call of one compilation.
#[derive(Debug, Clone, Default)]
pub struct Context {
    /// `define` bindings read back by `use`
    pub defines: HashMap<String, Token>,
    pub allocator: Allocator,
}

impl Context {
    pub fn new() -> Self {
        Self::default()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Allocation {
    pub address: usize,
    pub size: usize,
}

impl Allocation {
    /// Last unit covered.
    pub fn end(&self) -> usize {
        (self.address + self.size).saturating_sub(1)
    }
}

/// Bump allocator over data memory.
#[derive(Debug, Clone, Default)]
pub struct Allocator {
    next: usize,
    allocations: IndexMap<String, Allocation>,
}

impl Allocator {
    /// Reserves `size` units for `name`. A name allocated twice keeps the
    /// latest range. The cursor stops at the last unit of memory.
    pub fn allocate(&mut self, name: &str, size: usize) -> Allocation {
        let alloc = Allocation {
            address: self.next,
            size,
        };
        self.allocations.insert(name.to_string(), alloc);
        self.next = self.next.saturating_add(size).min(MEMORY_SIZE - 1);
        alloc
    }

    pub fn get(&self, name: &str) -> Option<&Allocation> {
        self.allocations.get(name)
    }

    pub fn next_address(&self) -> usize {
        self.next
    }

    /// Less than `MEMORY_RESERVE` units are left.
    pub fn is_exhausted(&self) -> bool {
        self.next >= MEMORY_SIZE - MEMORY_RESERVE
    }
}
