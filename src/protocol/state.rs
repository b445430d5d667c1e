// Licensed to the Apache Software Foundation (ASF) under one
// or more contributor license agreements.  See the NOTICE file
// distributed with this work for additional information
// regarding copyright ownership.  The ASF licenses this file
// to you under the Apache License, Version 2.0 (the
// "License"); you may not use this file except in compliance
// with the License.  You may obtain a copy of the License at
//
//   http://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing,
// software distributed under the License is distributed on an
// "AS IS" BASIS, WITHOUT WARRANTIES OR CONDITIONS OF ANY
// KIND, either express or implied.  See the License for the
// specific language governing permissions and limitations
// under the License.

//! Call-ordering state machine shared by the reader and the writer.
//!
//! The compact protocol interleaves field ids with values and scopes the
//! delta base (`last field id`) to the innermost struct, so both codec
//! halves track where they are in the message grammar. Struct and container
//! frames live in fixed-capacity stacks; nesting past
//! [`MAX_NESTING_DEPTH`] is an error rather than a heap spill, since deep
//! recursion in hostile inputs is the classic way to blow the call stack.

use crate::errors::{Result, ThriftError};

/// Maximum struct/list nesting depth accepted by a codec instance.
pub const MAX_NESTING_DEPTH: usize = 64;

/// Position of a codec within the message grammar.
#[derive(Clone, Copy, Debug, Default, Eq, PartialEq)]
pub(crate) enum State {
    /// Outside any struct.
    #[default]
    Clear,
    /// Inside a struct, between fields.
    Field,
    /// Immediately after a non-boolean field header; a value must follow.
    Value,
    /// Inside a list or set body.
    Container,
    /// Immediately after a boolean field header; the bool value must follow.
    Bool,
}

// Fixed-capacity stack backing the nesting frames.
struct BoundedStack<T, const N: usize> {
    items: [T; N],
    len: usize,
}

impl<T: Copy + Default, const N: usize> BoundedStack<T, N> {
    fn new() -> Self {
        Self {
            items: [T::default(); N],
            len: 0,
        }
    }

    fn push(&mut self, item: T) -> Result<()> {
        if self.len == N {
            return Err(stack_err!("nesting exceeds {} levels", N));
        }
        self.items[self.len] = item;
        self.len += 1;
        Ok(())
    }

    fn pop(&mut self) -> Option<T> {
        if self.len == 0 {
            return None;
        }
        self.len -= 1;
        Some(self.items[self.len])
    }
}

// Saved context of an enclosing struct.
#[derive(Clone, Copy, Default)]
struct StructFrame {
    saved_state: State,
    saved_field_id: i16,
}

/// Tracks the legal-call-ordering state of one codec instance.
///
/// Every operation of the reader and writer funnels through one of the
/// transition methods here; an operation issued in the wrong state fails
/// with [`ThriftError::InvalidState`].
pub(crate) struct ProtocolState {
    state: State,
    last_field_id: i16,
    struct_frames: BoundedStack<StructFrame, MAX_NESTING_DEPTH>,
    container_frames: BoundedStack<State, MAX_NESTING_DEPTH>,
}

impl ProtocolState {
    pub(crate) fn new() -> Self {
        Self {
            state: State::Clear,
            last_field_id: 0,
            struct_frames: BoundedStack::new(),
            container_frames: BoundedStack::new(),
        }
    }

    /// Delta base for the next field id in the innermost struct.
    pub(crate) fn last_field_id(&self) -> i16 {
        self.last_field_id
    }

    pub(crate) fn set_last_field_id(&mut self, id: i16) {
        self.last_field_id = id;
    }

    /// A struct may start at the top level, as a list element, or as a field
    /// value. Saves the enclosing context and resets the delta base.
    pub(crate) fn begin_struct(&mut self) -> Result<()> {
        match self.state {
            State::Clear | State::Container | State::Value => {
                self.struct_frames.push(StructFrame {
                    saved_state: self.state,
                    saved_field_id: self.last_field_id,
                })?;
                self.state = State::Field;
                self.last_field_id = 0;
                Ok(())
            }
            _ => Err(state_err!("cannot begin struct in state {:?}", self.state)),
        }
    }

    pub(crate) fn end_struct(&mut self) -> Result<()> {
        if self.state != State::Field {
            return Err(state_err!("cannot end struct in state {:?}", self.state));
        }
        // The push in begin_struct is the only way to reach Field, so the
        // stack cannot be empty here.
        let frame = self
            .struct_frames
            .pop()
            .ok_or_else(|| state_err!("struct end without matching begin"))?;
        self.state = frame.saved_state;
        self.last_field_id = frame.saved_field_id;
        Ok(())
    }

    /// Field headers are only legal between fields of a struct.
    pub(crate) fn check_field(&self) -> Result<()> {
        if self.state != State::Field {
            return Err(state_err!("expected a struct context, state {:?}", self.state));
        }
        Ok(())
    }

    pub(crate) fn begin_field(&mut self, is_bool: bool) -> Result<()> {
        self.check_field()?;
        self.state = if is_bool { State::Bool } else { State::Value };
        Ok(())
    }

    pub(crate) fn end_field(&mut self) -> Result<()> {
        match self.state {
            State::Value | State::Bool => {
                self.state = State::Field;
                Ok(())
            }
            _ => Err(state_err!("cannot end field in state {:?}", self.state)),
        }
    }

    /// Non-boolean scalars are legal as field values and as list elements.
    pub(crate) fn check_scalar(&self) -> Result<()> {
        match self.state {
            State::Value | State::Container => Ok(()),
            _ => Err(state_err!("unexpected scalar in state {:?}", self.state)),
        }
    }

    /// Booleans are legal after a boolean field header and as list elements.
    pub(crate) fn check_bool(&self) -> Result<()> {
        match self.state {
            State::Bool | State::Container => Ok(()),
            _ => Err(state_err!("unexpected bool in state {:?}", self.state)),
        }
    }

    /// Boolean values outside a boolean field, i.e. list elements only.
    pub(crate) fn check_container(&self) -> Result<()> {
        if self.state != State::Container {
            return Err(state_err!("expected a list context, state {:?}", self.state));
        }
        Ok(())
    }

    /// Lists may start as field values or as elements of an enclosing list.
    pub(crate) fn begin_list(&mut self) -> Result<()> {
        match self.state {
            State::Value | State::Container => {
                self.container_frames.push(self.state)?;
                self.state = State::Container;
                Ok(())
            }
            _ => Err(state_err!("cannot begin list in state {:?}", self.state)),
        }
    }

    pub(crate) fn end_list(&mut self) -> Result<()> {
        if self.state != State::Container {
            return Err(state_err!("cannot end list in state {:?}", self.state));
        }
        self.state = self
            .container_frames
            .pop()
            .ok_or_else(|| state_err!("list end without matching begin"))?;
        Ok(())
    }
}
