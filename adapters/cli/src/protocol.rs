//! Line protocol spoken by the match referee.
//!
//! The header carries our stronghold position and the squad size. Every turn
//! then carries two `health mana` lines (ours first), an entity count and one
//! line per entity:
//!
//! ```text
//! id category x y shield controlled health vx vy base_directed threat
//! ```

use std::{io::BufRead, str::FromStr};

use thiserror::Error;
use warden_core::{EntityId, EntityRecord, Point, StrongholdReading, TurnSnapshot};

const ENTITY_FIELDS: usize = 11;

/// Reasons the referee input cannot be decoded.
#[derive(Debug, Error)]
pub(crate) enum ProtocolError {
    /// Reading from the input failed.
    #[error("failed to read input: {0}")]
    Io(#[from] std::io::Error),
    /// The input ended in the middle of a record.
    #[error("input ended while reading {expected}")]
    Truncated {
        /// Record that was being read.
        expected: &'static str,
    },
    /// A field could not be parsed as an integer of the expected range.
    #[error("line {line}: field `{field}` is not a valid {expected}")]
    MalformedInteger {
        /// One-based line number.
        line: usize,
        /// Offending text.
        field: String,
        /// Name of the expected type.
        expected: &'static str,
    },
    /// A line held the wrong number of fields.
    #[error("line {line}: expected {expected} fields, found {found}")]
    FieldCount {
        /// One-based line number.
        line: usize,
        /// Fields the record requires.
        expected: usize,
        /// Fields present on the line.
        found: usize,
    },
}

/// Match parameters announced before the first turn.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub(crate) struct Header {
    /// Position of our stronghold.
    pub(crate) base: Point,
    /// Agents each team controls.
    pub(crate) squad_size: usize,
}

/// Decodes referee lines from any buffered reader.
pub(crate) struct LineReader<R> {
    input: R,
    line: String,
    line_number: usize,
}

impl<R: BufRead> LineReader<R> {
    pub(crate) fn new(input: R) -> Self {
        Self {
            input,
            line: String::new(),
            line_number: 0,
        }
    }

    /// Reads the match header.
    pub(crate) fn read_header(&mut self) -> Result<Header, ProtocolError> {
        let [x, y] = self.record::<2>("stronghold position")?;
        let base = Point::new(self.int(x)?, self.int(y)?);
        let [squad_size] = self.record::<1>("squad size")?;
        let squad_size = self.int(squad_size)?;
        Ok(Header { base, squad_size })
    }

    /// Reads one turn. Returns `None` when the input ends cleanly between turns.
    pub(crate) fn read_turn(&mut self) -> Result<Option<TurnSnapshot>, ProtocolError> {
        if !self.next_line()? {
            return Ok(None);
        }
        let ours = self.stronghold()?;
        let theirs = self.read_stronghold("opposing stronghold")?;

        let [count] = self.record::<1>("entity count")?;
        let count: usize = self.int(count)?;
        let mut entities = Vec::with_capacity(count);
        for _ in 0..count {
            let fields = self.record::<ENTITY_FIELDS>("entity")?;
            entities.push(self.entity(fields)?);
        }

        Ok(Some(TurnSnapshot {
            ours,
            theirs,
            entities,
        }))
    }

    fn read_stronghold(
        &mut self,
        expected: &'static str,
    ) -> Result<StrongholdReading, ProtocolError> {
        if !self.next_line()? {
            return Err(ProtocolError::Truncated { expected });
        }
        self.stronghold()
    }

    /// Parses the current line as a `health mana` pair.
    fn stronghold(&self) -> Result<StrongholdReading, ProtocolError> {
        let [health, mana] = self.fields::<2>()?;
        Ok(StrongholdReading {
            health: self.int(health)?,
            mana: self.int(mana)?,
        })
    }

    fn entity(&self, fields: [String; ENTITY_FIELDS]) -> Result<EntityRecord, ProtocolError> {
        let [id, category, x, y, shield, controlled, health, vx, vy, base_directed, threat] =
            fields;
        Ok(EntityRecord {
            id: EntityId::new(self.int(id)?),
            category: self.int(category)?,
            position: Point::new(self.int(x)?, self.int(y)?),
            shield: self.int(shield)?,
            controlled: self.int::<i32>(controlled)? != 0,
            health: self.int(health)?,
            velocity: Point::new(self.int(vx)?, self.int(vy)?),
            base_directed: self.int::<i32>(base_directed)? != 0,
            threat: self.int(threat)?,
        })
    }

    /// Advances to the next line and splits it into exactly `N` fields.
    fn record<const N: usize>(
        &mut self,
        expected: &'static str,
    ) -> Result<[String; N], ProtocolError> {
        if !self.next_line()? {
            return Err(ProtocolError::Truncated { expected });
        }
        self.fields::<N>()
    }

    fn fields<const N: usize>(&self) -> Result<[String; N], ProtocolError> {
        let fields: Vec<String> = self.line.split_whitespace().map(str::to_owned).collect();
        let found = fields.len();
        fields.try_into().map_err(|_| ProtocolError::FieldCount {
            line: self.line_number,
            expected: N,
            found,
        })
    }

    fn int<T: FromStr>(&self, field: String) -> Result<T, ProtocolError> {
        field
            .parse()
            .map_err(|_| ProtocolError::MalformedInteger {
                line: self.line_number,
                field,
                expected: std::any::type_name::<T>(),
            })
    }

    /// Loads the next non-blank line. Returns false at the end of the input.
    fn next_line(&mut self) -> Result<bool, ProtocolError> {
        loop {
            self.line.clear();
            if self.input.read_line(&mut self.line)? == 0 {
                return Ok(false);
            }
            self.line_number += 1;
            if !self.line.trim().is_empty() {
                return Ok(true);
            }
        }
    }
}
