mod key;
use key::Key;

mod store;
use store::{Store, TableData};

use cti_core::{
    async_trait, bail,
    driver::{
        operation::{DeleteByKey, GetByKey, Insert, Operation, Scan, Transaction, UpdateByKey},
        Capability, Driver, Response,
    },
    schema::{Model, Schema},
    Result,
};

use std::sync::{Mutex, MutexGuard};

/// Stores every table in process memory.
///
/// Rows are kept in insertion order. Auto-increment columns count up from 1
/// per table. Transactions snapshot the whole store on `Start` and restore
/// it on `Rollback`; they do not nest.
#[derive(Debug, Default)]
pub struct Memory {
    state: Mutex<State>,
}

#[derive(Debug, Default)]
struct State {
    store: Store,

    /// Copy of the store taken when the open transaction started
    snapshot: Option<Store>,
}

impl Memory {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of rows currently stored in `table`.
    pub fn row_count(&self, table: &str) -> usize {
        self.lock()
            .store
            .tables
            .get(table)
            .map(|data| data.rows.len())
            .unwrap_or_default()
    }

    fn lock(&self) -> MutexGuard<'_, State> {
        // Every mutation is a single map operation; a poisoned store is
        // still consistent.
        self.state.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }
}

#[async_trait]
impl Driver for Memory {
    fn capability(&self) -> &Capability {
        &Capability::MEMORY
    }

    async fn register_schema(&self, schema: &Schema) -> Result<()> {
        let mut state = self.lock();
        for model in schema.models() {
            state
                .store
                .tables
                .entry(model.table.name.clone())
                .or_insert_with(TableData::default);
        }
        Ok(())
    }

    async fn exec(&self, schema: &Schema, op: Operation) -> Result<Response> {
        tracing::trace!(?op, "memory driver exec");

        let mut state = self.lock();
        match op {
            Operation::Insert(op) => state.insert(schema, op),
            Operation::UpdateByKey(op) => state.update_by_key(schema, op),
            Operation::GetByKey(op) => state.get_by_key(op),
            Operation::Scan(op) => state.scan(op),
            Operation::DeleteByKey(op) => state.delete_by_key(op),
            Operation::Transaction(op) => state.transaction(op),
        }
    }
}

impl State {
    fn insert(&mut self, schema: &Schema, op: Insert) -> Result<Response> {
        let model = model_for_table(schema, &op.table)?;
        let data = self.store.table_mut(&op.table)?;

        let mut record = op.record;
        for name in record.names() {
            if !model.has_column(name) {
                bail!("table `{}` has no column `{}`", op.table, name);
            }
        }

        if let Some(auto) = model.table.auto_increment_column() {
            match record.get(&auto.name).as_i64() {
                Some(explicit) => data.next_id = data.next_id.max(explicit + 1),
                None => {
                    record.set(auto.name.clone(), data.next_id);
                    data.next_id += 1;
                }
            }
        }

        let key_value = record.get(&model.primary_key).clone();
        let key = Key::try_from(&key_value)?;
        if data.rows.contains_key(&key) {
            bail!(
                "duplicate key {} for table `{}`",
                key_value,
                op.table
            );
        }

        // Store every column, in table order, so reads return full rows.
        let row = model
            .table
            .column_names()
            .map(|name| (name, record.get(name).clone()))
            .collect();
        data.rows.insert(key, row);

        Ok(Response::key(key_value))
    }

    fn update_by_key(&mut self, schema: &Schema, op: UpdateByKey) -> Result<Response> {
        let model = model_for_table(schema, &op.table)?;
        let data = self.store.table_mut(&op.table)?;
        let key = Key::try_from(&op.key)?;

        let Some(row) = data.rows.get_mut(&key) else {
            return Ok(Response::count(0));
        };

        for (name, value) in op.record {
            if !model.has_column(&name) {
                bail!("table `{}` has no column `{}`", op.table, name);
            }
            if name == model.primary_key && value != op.key {
                bail!("cannot change primary key of a row in `{}`", op.table);
            }
            row.set(name, value);
        }

        Ok(Response::count(1))
    }

    fn get_by_key(&self, op: GetByKey) -> Result<Response> {
        let data = self.store.table(&op.table)?;

        let mut records = vec![];
        for key in &op.keys {
            if let Some(row) = data.rows.get(&Key::try_from(key)?) {
                records.push(row.clone());
            }
        }

        Ok(Response::records(records))
    }

    fn scan(&self, op: Scan) -> Result<Response> {
        let data = self.store.table(&op.table)?;
        Ok(Response::records(data.rows.values().cloned().collect()))
    }

    fn delete_by_key(&mut self, op: DeleteByKey) -> Result<Response> {
        let data = self.store.table_mut(&op.table)?;

        let mut count = 0;
        for key in &op.keys {
            if data.rows.shift_remove(&Key::try_from(key)?).is_some() {
                count += 1;
            }
        }

        Ok(Response::count(count))
    }

    fn transaction(&mut self, op: Transaction) -> Result<Response> {
        match op {
            Transaction::Start => {
                if self.snapshot.is_some() {
                    bail!("a transaction is already open");
                }
                self.snapshot = Some(self.store.clone());
            }
            Transaction::Commit => {
                if self.snapshot.take().is_none() {
                    bail!("commit without an open transaction");
                }
            }
            Transaction::Rollback => match self.snapshot.take() {
                Some(snapshot) => self.store = snapshot,
                None => bail!("rollback without an open transaction"),
            },
        }

        Ok(Response::count(0))
    }
}

fn model_for_table<'a>(schema: &'a Schema, table: &str) -> Result<&'a Model> {
    match schema.models().find(|model| model.table.name == table) {
        Some(model) => Ok(model),
        None => bail!("no model is mapped to table `{}`", table),
    }
}
