//! Constraint and index naming convention
//!
//! Templates use `{table}`, `{column_0}`, `{column_0_label}`,
//! `{referred_table}` and `{constraint_name}` placeholders.

/// What a generated name is for
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConstraintKind {
    PrimaryKey,
    Unique,
    Check,
    ForeignKey,
    Index,
}

/// Inputs to a name template
#[derive(Debug, Clone, Copy, Default)]
pub struct NameParts<'a> {
    pub table: &'a str,
    pub column_0: Option<&'a str>,
    pub referred_table: Option<&'a str>,
    pub constraint_name: Option<&'a str>,
}

/// Name templates per constraint kind
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NamingConvention {
    pub pk: String,
    pub uq: String,
    pub ck: String,
    pub fk: String,
    pub ix: String,
}

impl Default for NamingConvention {
    fn default() -> Self {
        Self {
            pk: "pk_{table}".to_string(),
            uq: "uq_{table}_{column_0}".to_string(),
            ck: "ck_{table}_{constraint_name}".to_string(),
            fk: "fk_{table}_{column_0}_{referred_table}".to_string(),
            ix: "ix_{column_0_label}".to_string(),
        }
    }
}

impl NamingConvention {
    /// Render the name for a constraint of `kind`
    pub fn name(&self, kind: ConstraintKind, parts: NameParts<'_>) -> String {
        let template = match kind {
            ConstraintKind::PrimaryKey => &self.pk,
            ConstraintKind::Unique => &self.uq,
            ConstraintKind::Check => &self.ck,
            ConstraintKind::ForeignKey => &self.fk,
            ConstraintKind::Index => &self.ix,
        };

        let column_0 = parts.column_0.unwrap_or_default();
        let label = format!("{}_{}", parts.table, column_0);

        // {column_0_label} first: it contains the {column_0} prefix
        template
            .replace("{column_0_label}", &label)
            .replace("{table}", parts.table)
            .replace("{column_0}", column_0)
            .replace("{referred_table}", parts.referred_table.unwrap_or_default())
            .replace("{constraint_name}", parts.constraint_name.unwrap_or_default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parts<'a>(column_0: Option<&'a str>) -> NameParts<'a> {
        NameParts {
            table: "simplemodel",
            column_0,
            ..NameParts::default()
        }
    }

    #[test]
    fn test_default_names() {
        let naming = NamingConvention::default();
        assert_eq!(
            naming.name(ConstraintKind::PrimaryKey, parts(Some("id"))),
            "pk_simplemodel"
        );
        assert_eq!(
            naming.name(ConstraintKind::Unique, parts(Some("col_1"))),
            "uq_simplemodel_col_1"
        );
        assert_eq!(
            naming.name(ConstraintKind::Index, parts(Some("type"))),
            "ix_simplemodel_type"
        );
    }

    #[test]
    fn test_check_and_foreign_key_names() {
        let naming = NamingConvention::default();
        let check = NameParts {
            constraint_name: Some("type"),
            ..parts(None)
        };
        assert_eq!(naming.name(ConstraintKind::Check, check), "ck_simplemodel_type");

        let fk = NameParts {
            referred_table: Some("owner"),
            ..parts(Some("owner_id"))
        };
        assert_eq!(
            naming.name(ConstraintKind::ForeignKey, fk),
            "fk_simplemodel_owner_id_owner"
        );
    }
}
