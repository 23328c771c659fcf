use serde::Deserialize;
use sqlx::{Postgres, QueryBuilder};

use crate::models::alert::Alerta;

/// Transient conjunctive filter over the alert collection. Only present
/// fields constrain the result; an all-absent filter matches everything.
/// Comparisons are exact and case sensitive, matching the stored values.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct AlertFilter {
    pub tipo: Option<String>,
    pub severidad: Option<String>,
    pub ciudad: Option<String>,
    pub pais: Option<String>,
}

impl AlertFilter {
    pub fn by_location(ciudad: String, pais: String) -> Self {
        Self {
            ciudad: Some(ciudad),
            pais: Some(pais),
            ..Default::default()
        }
    }

    /// True when no field constrains the result. Callers use this to keep
    /// "no filter applied" distinguishable from "filter matched nothing".
    pub fn is_empty(&self) -> bool {
        self.fields().iter().all(|(_, v)| v.is_none())
    }

    /// In-memory evaluation of the predicate, shared by the memory-backed
    /// repository and tests.
    pub fn matches(&self, alerta: &Alerta) -> bool {
        let candidates = [
            (self.tipo.as_deref(), alerta.tipo.as_str()),
            (self.severidad.as_deref(), alerta.severidad.as_str()),
            (self.ciudad.as_deref(), alerta.ciudad.as_str()),
            (self.pais.as_deref(), alerta.pais.as_str()),
        ];
        candidates
            .into_iter()
            .all(|(wanted, actual)| wanted.map_or(true, |v| v == actual))
    }

    /// Appends `WHERE`/`AND` equality conditions for the present fields to a
    /// query builder, binding values instead of interpolating them.
    pub fn push_conditions<'q>(&'q self, qb: &mut QueryBuilder<'q, Postgres>) {
        let mut sep = " WHERE ";
        for (col, val) in self.fields() {
            if let Some(v) = val {
                qb.push(sep);
                qb.push(col);
                qb.push(" = ");
                qb.push_bind(v.as_str());
                sep = " AND ";
            }
        }
    }

    fn fields(&self) -> [(&'static str, &Option<String>); 4] {
        [
            ("tipo", &self.tipo),
            ("severidad", &self.severidad),
            ("ciudad", &self.ciudad),
            ("pais", &self.pais),
        ]
    }
}
