//! Scripted doubles for the capability traits.
//!
//! Every statement and sync call is recorded so tests can assert exactly
//! what was issued, in order, without a live database.

// Each test binary compiles this module and uses a different subset of it.
#![allow(dead_code)]

use std::collections::HashSet;
use std::sync::Mutex;
use std::sync::atomic::{AtomicUsize, Ordering};
use trueup::{
    BoxFuture, Dialect, Error, Executor, Row, SchemaConnection, SyncOptions, SyncReport,
    SyncTarget, Value,
};

const CATALOG_PROBE: &str = "SELECT 1 FROM pg_extension WHERE extname = $1";

/// A connection double with a fake extension catalog and a scriptable sync
/// primitive.
pub struct MockConnection {
    dialect: Dialect,
    /// Every statement issued (queries and executes), in order.
    pub statements: Mutex<Vec<String>>,
    /// Extensions present in the fake catalog.
    pub installed: Mutex<HashSet<String>>,
    /// Extension names whose CREATE EXTENSION must fail.
    pub failing_installs: HashSet<String>,
    /// Substrings of execute statements that must fail.
    pub failing_statements: Vec<String>,
    /// Fail every catalog probe when true.
    pub failing_probes: bool,
    /// Recorded sync calls.
    pub sync_calls: Mutex<Vec<SyncOptions>>,
    /// Number of upcoming sync calls that must fail.
    pub failing_syncs: AtomicUsize,
}

impl MockConnection {
    pub fn new(dialect: Dialect) -> Self {
        Self {
            dialect,
            statements: Mutex::new(Vec::new()),
            installed: Mutex::new(HashSet::new()),
            failing_installs: HashSet::new(),
            failing_statements: Vec::new(),
            failing_probes: false,
            sync_calls: Mutex::new(Vec::new()),
            failing_syncs: AtomicUsize::new(0),
        }
    }

    pub fn with_installed(self, names: &[&str]) -> Self {
        {
            let mut installed = self.installed.lock().unwrap();
            for name in names {
                installed.insert((*name).to_owned());
            }
        }
        self
    }

    pub fn recorded_statements(&self) -> Vec<String> {
        self.statements.lock().unwrap().clone()
    }

    pub fn recorded_syncs(&self) -> Vec<SyncOptions> {
        self.sync_calls.lock().unwrap().clone()
    }

    fn record(&self, sql: &str) {
        self.statements.lock().unwrap().push(sql.to_owned());
    }
}

/// Pull the extension name out of `CREATE EXTENSION IF NOT EXISTS "name"`.
fn create_extension_target(sql: &str) -> Option<&str> {
    sql.strip_prefix("CREATE EXTENSION IF NOT EXISTS ")
        .map(|rest| rest.trim_matches('"'))
}

impl Executor for MockConnection {
    fn execute<'a>(&'a self, sql: &'a str, _params: &'a [Value]) -> BoxFuture<'a, Result<u64, Error>> {
        Box::pin(async move {
            self.record(sql);

            if self.failing_statements.iter().any(|p| sql.contains(p)) {
                return Err(Error::Statement(format!("scripted failure: {sql}")));
            }

            if let Some(name) = create_extension_target(sql) {
                if self.failing_installs.contains(name) {
                    return Err(Error::Statement(format!(
                        "scripted install failure: {name}"
                    )));
                }
                self.installed.lock().unwrap().insert(name.to_owned());
            }

            Ok(0)
        })
    }

    fn query<'a>(
        &'a self,
        sql: &'a str,
        params: &'a [Value],
    ) -> BoxFuture<'a, Result<Vec<Row>, Error>> {
        Box::pin(async move {
            self.record(sql);

            if self.failing_probes {
                return Err(Error::Statement(format!("scripted probe failure: {sql}")));
            }

            if sql == CATALOG_PROBE {
                let name = match params.first() {
                    Some(Value::String(name)) => name.clone(),
                    other => panic!("catalog probe should bind the name, got {other:?}"),
                };
                if self.installed.lock().unwrap().contains(&name) {
                    return Ok(vec![vec![("?column?".to_owned(), Value::I32(1))]]);
                }
                return Ok(Vec::new());
            }

            Ok(Vec::new())
        })
    }
}

impl SchemaConnection for MockConnection {
    fn dialect(&self) -> &Dialect {
        &self.dialect
    }

    fn sync<'a>(&'a self, options: SyncOptions) -> BoxFuture<'a, Result<SyncReport, Error>> {
        Box::pin(async move {
            self.sync_calls.lock().unwrap().push(options);

            let remaining = self.failing_syncs.load(Ordering::SeqCst);
            if remaining > 0 {
                self.failing_syncs.store(remaining - 1, Ordering::SeqCst);
                return Err(Error::Sync("scripted sync failure".to_owned()));
            }

            Ok(SyncReport {
                tables: Vec::new(),
                forced: options.force,
            })
        })
    }
}

impl SyncTarget for MockConnection {
    fn sync<'a>(&'a self, options: SyncOptions) -> BoxFuture<'a, Result<SyncReport, Error>> {
        SchemaConnection::sync(self, options)
    }

    fn connection(&self) -> &dyn SchemaConnection {
        self
    }
}

/// A single-model double bound to a [`MockConnection`].
pub struct MockModel<'c> {
    conn: &'c MockConnection,
    pub name: String,
    /// Recorded sync calls against this model.
    pub sync_calls: Mutex<Vec<SyncOptions>>,
    /// Number of upcoming sync calls that must fail.
    pub failing_syncs: AtomicUsize,
}

impl<'c> MockModel<'c> {
    pub fn new(conn: &'c MockConnection, name: &str) -> Self {
        Self {
            conn,
            name: name.to_owned(),
            sync_calls: Mutex::new(Vec::new()),
            failing_syncs: AtomicUsize::new(0),
        }
    }

    pub fn recorded_syncs(&self) -> Vec<SyncOptions> {
        self.sync_calls.lock().unwrap().clone()
    }
}

impl SyncTarget for MockModel<'_> {
    fn sync<'a>(&'a self, options: SyncOptions) -> BoxFuture<'a, Result<SyncReport, Error>> {
        Box::pin(async move {
            self.sync_calls.lock().unwrap().push(options);

            let remaining = self.failing_syncs.load(Ordering::SeqCst);
            if remaining > 0 {
                self.failing_syncs.store(remaining - 1, Ordering::SeqCst);
                return Err(Error::Sync("scripted sync failure".to_owned()));
            }

            Ok(SyncReport {
                tables: vec![self.name.clone()],
                forced: options.force,
            })
        })
    }

    fn connection(&self) -> &dyn SchemaConnection {
        self.conn
    }
}

/// Install a subscriber so failing tests show the statement spans.
#[allow(dead_code)]
pub fn init_tracing() {
    use tracing_subscriber::EnvFilter;

    let _ = tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_test_writer()
        .try_init();
}
