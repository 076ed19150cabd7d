//! Id sampling for load generation.

use std::collections::BTreeMap;

use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use rand::{Rng, SeedableRng};
use serde::Serialize;

use crate::error::Result;
use crate::operation::Operation;
use crate::session::{Backend, Session};

/// Every root id per operation, in random order.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(transparent)]
pub struct EntityIds(BTreeMap<Operation, Vec<i64>>);

impl EntityIds {
    /// Ids for `operation`; empty when the table has no rows.
    pub fn get(&self, operation: Operation) -> &[i64] {
        self.0.get(&operation).map(Vec::as_slice).unwrap_or(&[])
    }

    /// Iterate over operations and their ids.
    pub fn iter(&self) -> impl Iterator<Item = (Operation, &[i64])> {
        self.0.iter().map(|(op, ids)| (*op, ids.as_slice()))
    }

    /// Total number of ids across all operations.
    pub fn len(&self) -> usize {
        self.0.values().map(Vec::len).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// Load every id for every operation, shuffled with `rng`.
pub async fn load_ids_with<B, R>(backend: &B, rng: &mut R) -> Result<EntityIds>
where
    B: Backend + ?Sized,
    R: Rng + Send + ?Sized,
{
    let mut conn = backend.acquire().await?;
    let mut ids = BTreeMap::new();

    for operation in Operation::ALL {
        let mut listed = conn.ids(operation).await?;
        listed.shuffle(rng);
        tracing::debug!(%operation, count = listed.len(), "loaded ids");
        ids.insert(operation, listed);
    }

    Ok(EntityIds(ids))
}

/// Load every id for every operation in a fresh random order.
pub async fn load_ids<B>(backend: &B) -> Result<EntityIds>
where
    B: Backend + ?Sized,
{
    let mut rng = StdRng::from_entropy();
    load_ids_with(backend, &mut rng).await
}
