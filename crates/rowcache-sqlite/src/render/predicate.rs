use crate::{
    error::SqliteError,
    render::{SqlDialect, Writer},
};
use rowcache_core::{
    order::OrderDirection,
    predicate::{BoundaryPredicate, BoundarySide, ComparePredicate, Predicate, TextOp, TextPredicate},
    value::{TextMode, Value},
};
use std::fmt::Write as _;

// Direction of a value relative to a boundary value, nulls lowest.
#[derive(Clone, Copy)]
enum Relative {
    Above,
    Below,
}

impl Writer {
    pub(super) fn predicate(&mut self, predicate: &Predicate) -> Result<(), SqliteError> {
        match predicate {
            Predicate::True => self.push_bool(true),
            Predicate::False => self.push_bool(false),
            Predicate::And(preds) => self.junction(preds, " AND ", true)?,
            Predicate::Or(preds) => self.junction(preds, " OR ", false)?,
            Predicate::Not(inner) => {
                self.sql.push_str("NOT (");
                self.predicate(inner)?;
                self.sql.push(')');
            }
            Predicate::Compare(cmp) => self.compare(cmp)?,
            Predicate::IsNull { field } => {
                let expr = self.field_expr(field)?;
                let _ = write!(self.sql, "{expr} IS NULL");
            }
            Predicate::Text(text) => self.text(text)?,
            Predicate::Boundary(boundary) => self.boundary(boundary)?,
        }

        Ok(())
    }

    // An empty junction renders as its identity.
    fn junction(
        &mut self,
        preds: &[Predicate],
        separator: &str,
        identity: bool,
    ) -> Result<(), SqliteError> {
        if preds.is_empty() {
            self.push_bool(identity);
            return Ok(());
        }

        self.sql.push('(');
        for (index, pred) in preds.iter().enumerate() {
            if index > 0 {
                self.sql.push_str(separator);
            }
            self.predicate(pred)?;
        }
        self.sql.push(')');

        Ok(())
    }

    fn compare(&mut self, cmp: &ComparePredicate) -> Result<(), SqliteError> {
        let expr = self.field_expr(&cmp.field)?;
        let _ = write!(self.sql, "{expr} {} ", cmp.op.as_sql());
        self.push_param(cmp.value.clone());

        Ok(())
    }

    fn text(&mut self, text: &TextPredicate) -> Result<(), SqliteError> {
        let expr = self.field_expr(&text.field)?;

        match (text.mode, self.dialect) {
            // SQLite LIKE folds ASCII case itself; LOWER() would fold only the
            // column side, so the pattern is passed through unchanged.
            (TextMode::Ci, SqlDialect::Sqlite) => {
                let _ = write!(self.sql, "CAST({expr} AS TEXT) LIKE ");
                self.push_param(Value::Text(like_pattern(&text.value, text.op)));
                self.sql.push_str(" ESCAPE '\\'");
            }
            (TextMode::Ci, SqlDialect::Postgres) => {
                let _ = write!(self.sql, "LOWER(CAST({expr} AS TEXT)) LIKE ");
                self.push_param(Value::Text(like_pattern(&text.value.to_lowercase(), text.op)));
                self.sql.push_str(" ESCAPE '\\'");
            }
            // GLOB is case-sensitive.
            (TextMode::Cs, SqlDialect::Sqlite) => {
                let _ = write!(self.sql, "CAST({expr} AS TEXT) GLOB ");
                self.push_param(Value::Text(glob_pattern(&text.value, text.op)));
            }
            (TextMode::Cs, SqlDialect::Postgres) => {
                let _ = write!(self.sql, "CAST({expr} AS TEXT) LIKE ");
                self.push_param(Value::Text(like_pattern(&text.value, text.op)));
                self.sql.push_str(" ESCAPE '\\'");
            }
        }

        Ok(())
    }

    // Strict "sorts after/before" as a cascading CASE: the first key whose
    // value differs from the boundary decides, equal keys fall through to the
    // next one.
    fn boundary(&mut self, boundary: &BoundaryPredicate) -> Result<(), SqliteError> {
        self.sql.push_str("(CASE");

        for (key, value) in boundary.order.keys().iter().zip(&boundary.boundary.values) {
            let expr = self.field_expr(&key.field)?;

            let (later, earlier) = match key.direction {
                OrderDirection::Asc => (Relative::Above, Relative::Below),
                OrderDirection::Desc => (Relative::Below, Relative::Above),
            };
            let (hit, miss) = match boundary.side {
                BoundarySide::After => (later, earlier),
                BoundarySide::Before => (earlier, later),
            };

            self.case_arm(&expr, value, hit, true);
            self.case_arm(&expr, value, miss, false);
        }

        self.sql.push_str(" ELSE ");
        self.push_bool(false);
        self.sql.push_str(" END)");

        if self.dialect == SqlDialect::Sqlite {
            self.sql.push_str(" = 1");
        }

        Ok(())
    }

    // Nothing sorts below a null boundary value, so that arm is skipped.
    fn case_arm(&mut self, expr: &str, value: &Value, relative: Relative, result: bool) {
        match (relative, value.is_null()) {
            (Relative::Above, true) => {
                let _ = write!(self.sql, " WHEN {expr} IS NOT NULL THEN ");
            }
            (Relative::Below, true) => return,
            (Relative::Above, false) => {
                let _ = write!(self.sql, " WHEN {expr} > ");
                self.push_param(value.clone());
                self.sql.push_str(" THEN ");
            }
            (Relative::Below, false) => {
                let _ = write!(self.sql, " WHEN ({expr} < ");
                self.push_param(value.clone());
                let _ = write!(self.sql, " OR {expr} IS NULL) THEN ");
            }
        }

        self.push_bool(result);
    }
}

// LIKE pattern with `\` as the escape character.
fn like_pattern(text: &str, op: TextOp) -> String {
    let mut escaped = String::with_capacity(text.len());
    for c in text.chars() {
        if matches!(c, '\\' | '%' | '_') {
            escaped.push('\\');
        }
        escaped.push(c);
    }

    anchor(&escaped, op, '%')
}

// GLOB has no escape character; metacharacters are wrapped in brackets.
fn glob_pattern(text: &str, op: TextOp) -> String {
    let mut escaped = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '*' | '?' | '[' => {
                escaped.push('[');
                escaped.push(c);
                escaped.push(']');
            }
            _ => escaped.push(c),
        }
    }

    anchor(&escaped, op, '*')
}

fn anchor(escaped: &str, op: TextOp, wildcard: char) -> String {
    match op {
        TextOp::Contains => format!("{wildcard}{escaped}{wildcard}"),
        TextOp::StartsWith => format!("{escaped}{wildcard}"),
        TextOp::EndsWith => format!("{wildcard}{escaped}"),
    }
}
