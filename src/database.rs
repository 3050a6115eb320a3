use crate::{
    ColumnDef, Value,
    ast::{Select, Statement},
    config::DatabaseConfig,
    error::{Error, Result},
    join::merge_all,
    parser::parse_statement,
    storage,
    table::{Schema, Table},
};
use std::collections::HashMap;
use tracing::{info, warn};

/// The catalog of named tables and the entry point for query execution.
///
/// The database owns every table; statements borrow from it and a new table
/// is only bound to a name once it has been built completely.
#[derive(Debug, Default)]
pub struct Database {
    /// A map of table names to their respective [Table] structures.
    tables: HashMap<String, Table>,
    config: DatabaseConfig,
}

impl Database {
    /// Creates a new, empty database using the current directory for table files.
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a new, empty database with the given storage settings.
    pub fn with_config(config: DatabaseConfig) -> Self {
        Self {
            tables: HashMap::default(),
            config,
        }
    }

    /// Declares an empty table, replacing any table already bound to `name`.
    pub fn declare_table(&mut self, name: impl Into<String>, columns: Vec<ColumnDef>) -> &mut Table {
        let name = name.into();
        info!(table = %name, columns = columns.len(), "declared table");
        let slot = self.tables.entry(name).or_default();
        *slot = Table::new(Schema::new(columns));
        slot
    }

    /// Binds a fully built table to `name`, replacing any previous binding.
    pub fn register(&mut self, name: impl Into<String>, table: Table) {
        let name = name.into();
        info!(table = %name, rows = table.row_count(), "registered table");
        self.tables.insert(name, table);
    }

    /// Removes a table from the database by its name.
    ///
    /// # Errors
    /// Returns [Error::TableNotFound] if the table does not exist.
    pub fn drop_table(&mut self, name: &str) -> Result<Table> {
        let table = self
            .tables
            .remove(name)
            .ok_or_else(|| Error::TableNotFound(name.to_string()))?;
        info!(table = %name, "dropped table");
        Ok(table)
    }

    /// Retrieves a reference to a table by name.
    pub fn get_table(&self, name: &str) -> Option<&Table> {
        self.tables.get(name)
    }

    /// Retrieves a mutable reference to a table by name.
    pub fn get_table_mut(&mut self, name: &str) -> Option<&mut Table> {
        self.tables.get_mut(name)
    }

    /// Like [Database::get_table], but a missing table is an error.
    pub fn table(&self, name: &str) -> Result<&Table> {
        self.get_table(name)
            .ok_or_else(|| Error::TableNotFound(name.to_string()))
    }

    /// Returns the names of all tables, sorted.
    pub fn list_tables(&self) -> Vec<&str> {
        let mut names: Vec<&str> = self.tables.keys().map(String::as_str).collect();
        names.sort_unstable();
        names
    }

    /// Appends one row to the named table.
    ///
    /// # Errors
    /// - [Error::TableNotFound] if no table is bound to `name`.
    /// - [Error::SchemaViolation] if the row does not fit; the table is unchanged.
    pub fn insert(&mut self, name: &str, values: Vec<Value>) -> Result<()> {
        self.get_table_mut(name)
            .ok_or_else(|| Error::TableNotFound(name.to_string()))?
            .insert(values)
    }

    /// Resolves every name, then joins the tables left to right.
    ///
    /// # Errors
    /// Returns [Error::TableNotFound] for the first name that is not bound.
    pub fn merge_tables(&self, names: &[String]) -> Result<Table> {
        let tables = names
            .iter()
            .map(|name| self.table(name))
            .collect::<Result<Vec<_>>>()?;
        merge_all(&tables).ok_or_else(|| Error::malformed("no source table"))
    }

    /// Runs a select: join the source tables, then filter and project once
    /// per `and` clause. Nothing is registered.
    pub fn select(&self, select: &Select) -> Result<Table> {
        self.merge_tables(&select.tables)?
            .evaluate(&select.projections, &select.conditions)
    }

    /// Reads `<data_dir>/<name>.<extension>` and binds it to `name`.
    pub fn load(&mut self, name: &str) -> Result<()> {
        let path = self.config.table_path(name);
        let table = storage::load_table(&path)?;
        info!(table = %name, path = %path.display(), rows = table.row_count(), "loaded table");
        self.tables.insert(name.to_string(), table);
        Ok(())
    }

    /// Writes the named table to `<data_dir>/<name>.<extension>`.
    pub fn store(&self, name: &str) -> Result<()> {
        let path = self.config.table_path(name);
        storage::store_table(self.table(name)?, &path)?;
        info!(table = %name, path = %path.display(), "stored table");
        Ok(())
    }

    /// Parses and runs one statement.
    ///
    /// `print` and `select` return the rendered table; every other statement
    /// returns an empty string.
    ///
    /// # Errors
    /// Any error of the statement. The catalog is left as it was.
    ///
    /// # Example
    /// ```
    /// use reldb::Database;
    /// let mut db = Database::new();
    /// db.execute("create table t (n int)").unwrap();
    /// db.execute("insert into t values 1").unwrap();
    /// db.execute("insert into t values 2").unwrap();
    ///
    /// let result = db.execute("select n * 10 as m from t where n > 1").unwrap();
    /// assert_eq!(result, "m int\n20");
    /// ```
    pub fn execute(&mut self, query: &str) -> Result<String> {
        let output = match parse_statement(query)? {
            Statement::CreateTable(create) => {
                self.declare_table(create.name, create.columns);
                String::new()
            }
            Statement::CreateTableAs(create) => {
                let table = self.select(&create.select)?;
                self.register(create.name, table);
                String::new()
            }
            Statement::Load(name) => {
                self.load(&name)?;
                String::new()
            }
            Statement::Store(name) => {
                self.store(&name)?;
                String::new()
            }
            Statement::DropTable(name) => {
                self.drop_table(&name)?;
                String::new()
            }
            Statement::InsertInto(insert) => {
                self.insert(&insert.table, insert.values)?;
                String::new()
            }
            Statement::Print(name) => self.table(&name)?.render(),
            Statement::Select(select) => self.select(&select)?.render(),
        };
        Ok(output)
    }

    /// Runs one statement and never fails: errors come back as text
    /// prefixed with `ERROR: `.
    pub fn transact(&mut self, query: &str) -> String {
        match self.execute(query) {
            Ok(output) => output,
            Err(err) => {
                warn!(%err, query, "statement failed");
                format!("ERROR: {err}")
            }
        }
    }
}
