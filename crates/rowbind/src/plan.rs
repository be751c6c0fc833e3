mod convert;
use convert::Convert;

use crate::{mapping::ColumnMapping, Entity};

use rowbind_core::{Cursor, EntityDescriptor, Error, Fingerprint, Result};

/// A compiled mapping plan for one (fingerprint, target type, column range).
///
/// The plan is a small instruction list interpreted per row: each
/// instruction reads one column, converts the value to the destination
/// field's declared type and writes the field. Column resolution and
/// conversion-op selection happen once, at compile time; applying a row
/// performs no type inspection beyond the chosen ops.
///
/// Plans are immutable after compilation and safe to share across threads.
pub struct MapPlan {
    fingerprint: Fingerprint,
    target: &'static EntityDescriptor,
    instructions: Vec<Instr>,
}

struct Instr {
    column: usize,
    field: usize,
    op: Convert,
}

impl MapPlan {
    pub(crate) fn compile(
        fingerprint: &Fingerprint,
        target: &'static EntityDescriptor,
        range: (usize, usize),
        registry: &ColumnMapping,
    ) -> Result<MapPlan> {
        if target.fields.is_empty() {
            return Err(Error::no_mappable_members(target.name));
        }

        let mut instructions = Vec::new();
        let mut bound = vec![false; target.fields.len()];

        for column in range.0..range.1 {
            let Some(name) = registry.resolve(target, fingerprint, column) else {
                continue;
            };
            // A resolved name that hits no field binds the column to
            // nothing (the suppress-by-bogus-name convention).
            let Some(field) = target.field_index(&name) else {
                continue;
            };
            // The first column binding a field wins; later duplicates are
            // skipped so each field is populated at most once per row.
            if std::mem::replace(&mut bound[field], true) {
                continue;
            }

            let descriptor = target.field(field);
            let op = Convert::choose(fingerprint.column_type(column), descriptor.ty)
                .ok_or_else(|| {
                    Error::type_mismatch(
                        fingerprint.column_name(column),
                        fingerprint.column_type(column),
                        target.member_name(field),
                        descriptor.ty,
                    )
                })?;

            instructions.push(Instr { column, field, op });
        }

        tracing::debug!(
            target_type = target.name,
            columns = range.1 - range.0,
            bound = instructions.len(),
            "compiled mapping plan"
        );

        Ok(MapPlan {
            fingerprint: fingerprint.clone(),
            target,
            instructions,
        })
    }

    /// The fingerprint this plan was compiled against.
    pub fn fingerprint(&self) -> &Fingerprint {
        &self.fingerprint
    }

    /// Fields this plan populates, by index into the target's descriptor.
    pub fn bound_fields(&self) -> impl Iterator<Item = usize> + '_ {
        self.instructions.iter().map(|instr| instr.field)
    }

    /// Maps the cursor's current row into an existing instance.
    ///
    /// A conversion failure aborts the row; no partially mapped state is
    /// reported as success.
    pub fn apply_to<T: Entity, C: Cursor + ?Sized>(
        &self,
        cursor: &C,
        target: &mut T,
    ) -> Result<()> {
        debug_assert!(
            std::ptr::eq(T::descriptor(), self.target),
            "plan compiled for a different target type"
        );

        for instr in &self.instructions {
            let raw = cursor.value(instr.column)?;
            let value = self.convert(instr, raw)?;
            target.apply(instr.field, value)?;
        }
        Ok(())
    }

    /// Materializes a new instance from the cursor's current row.
    pub fn materialize<T: Entity, C: Cursor + ?Sized>(&self, cursor: &C) -> Result<T> {
        let mut target = T::default();
        self.apply_to(cursor, &mut target)?;
        Ok(target)
    }
}
