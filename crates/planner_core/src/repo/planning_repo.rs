//! Planning collection repository and SQLite implementation.
//!
//! # Responsibility
//! - Persist each planning collection as one JSON payload row.
//! - Load a full `PlanningContext` back from storage.
//!
//! # Invariants
//! - Write paths call `Validate::validate()` on every record before SQL mutations.
//! - `save_context` writes all collections in one transaction.
//! - Read paths reject undecodable payloads instead of masking them.
//! - Missing collections load as empty.

use crate::analysis::skills::infer_legacy_source;
use crate::context::PlanningContext;
use crate::db::DbError;
use crate::model::{ModelValidationError, Validate};
use log::info;
use rusqlite::{params, Connection, OptionalExtension};
use serde::de::DeserializeOwned;
use serde::Serialize;
use std::error::Error;
use std::fmt::{Display, Formatter};

/// Payload encoding written by this binary.
pub const PAYLOAD_FORMAT: i64 = 1;

pub type RepoResult<T> = Result<T, RepoError>;

/// Repository error for planning persistence.
#[derive(Debug)]
pub enum RepoError {
    Validation(ModelValidationError),
    Db(DbError),
    Serialization(serde_json::Error),
    InvalidData(String),
}

impl Display for RepoError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Validation(err) => write!(f, "{err}"),
            Self::Db(err) => write!(f, "{err}"),
            Self::Serialization(err) => write!(f, "failed to encode collection: {err}"),
            Self::InvalidData(message) => write!(f, "invalid persisted planning data: {message}"),
        }
    }
}

impl Error for RepoError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Validation(err) => Some(err),
            Self::Db(err) => Some(err),
            Self::Serialization(err) => Some(err),
            Self::InvalidData(_) => None,
        }
    }
}

impl From<ModelValidationError> for RepoError {
    fn from(value: ModelValidationError) -> Self {
        Self::Validation(value)
    }
}

impl From<DbError> for RepoError {
    fn from(value: DbError) -> Self {
        Self::Db(value)
    }
}

impl From<rusqlite::Error> for RepoError {
    fn from(value: rusqlite::Error) -> Self {
        Self::Db(DbError::Sqlite(value))
    }
}

impl From<serde_json::Error> for RepoError {
    fn from(value: serde_json::Error) -> Self {
        Self::Serialization(value)
    }
}

/// Storage key of one planning collection.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum CollectionKey {
    Skills,
    Solutions,
    Projects,
    ProjectSkills,
    ProjectSolutions,
    Epics,
    Teams,
    Divisions,
    DivisionBudgets,
    People,
    PersonSkills,
    Roles,
    Cycles,
    Allocations,
    RunWorkCategories,
    FinancialConfig,
}

impl CollectionKey {
    pub const ALL: [CollectionKey; 16] = [
        Self::Skills,
        Self::Solutions,
        Self::Projects,
        Self::ProjectSkills,
        Self::ProjectSolutions,
        Self::Epics,
        Self::Teams,
        Self::Divisions,
        Self::DivisionBudgets,
        Self::People,
        Self::PersonSkills,
        Self::Roles,
        Self::Cycles,
        Self::Allocations,
        Self::RunWorkCategories,
        Self::FinancialConfig,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            Self::Skills => "skills",
            Self::Solutions => "solutions",
            Self::Projects => "projects",
            Self::ProjectSkills => "project_skills",
            Self::ProjectSolutions => "project_solutions",
            Self::Epics => "epics",
            Self::Teams => "teams",
            Self::Divisions => "divisions",
            Self::DivisionBudgets => "division_budgets",
            Self::People => "people",
            Self::PersonSkills => "person_skills",
            Self::Roles => "roles",
            Self::Cycles => "cycles",
            Self::Allocations => "allocations",
            Self::RunWorkCategories => "run_work_categories",
            Self::FinancialConfig => "financial_config",
        }
    }

    pub fn parse(value: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|key| key.as_str() == value)
    }
}

/// Repository interface for planning collections.
pub trait PlanningRepository {
    fn load_context(&self) -> RepoResult<PlanningContext>;
    fn save_context(&self, context: &PlanningContext) -> RepoResult<()>;
    fn save_collection<T: Serialize + Validate>(
        &self,
        key: CollectionKey,
        items: &[T],
    ) -> RepoResult<()>;
    fn collection_counts(&self) -> RepoResult<Vec<(CollectionKey, u64)>>;
}

/// SQLite-backed planning repository.
pub struct SqlitePlanningRepository<'conn> {
    conn: &'conn Connection,
}

impl<'conn> SqlitePlanningRepository<'conn> {
    pub fn new(conn: &'conn Connection) -> Self {
        Self { conn }
    }
}

impl PlanningRepository for SqlitePlanningRepository<'_> {
    fn load_context(&self) -> RepoResult<PlanningContext> {
        let conn = self.conn;
        let mut context = PlanningContext {
            skills: read_collection(conn, CollectionKey::Skills)?,
            solutions: read_collection(conn, CollectionKey::Solutions)?,
            projects: read_collection(conn, CollectionKey::Projects)?,
            project_skills: read_collection(conn, CollectionKey::ProjectSkills)?,
            project_solutions: read_collection(conn, CollectionKey::ProjectSolutions)?,
            epics: read_collection(conn, CollectionKey::Epics)?,
            teams: read_collection(conn, CollectionKey::Teams)?,
            divisions: read_collection(conn, CollectionKey::Divisions)?,
            division_budgets: read_collection(conn, CollectionKey::DivisionBudgets)?,
            people: read_collection(conn, CollectionKey::People)?,
            person_skills: read_collection(conn, CollectionKey::PersonSkills)?,
            roles: read_collection(conn, CollectionKey::Roles)?,
            cycles: read_collection(conn, CollectionKey::Cycles)?,
            allocations: read_collection(conn, CollectionKey::Allocations)?,
            run_work_categories: read_collection(conn, CollectionKey::RunWorkCategories)?,
            financial_config: read_payload(conn, CollectionKey::FinancialConfig)?
                .unwrap_or_default(),
        };
        let upgraded = upgrade_legacy_provenance(&mut context);

        info!(
            "event=context_load module=repo status=ok projects={} teams={} allocations={} upgraded_provenance={}",
            context.projects.len(),
            context.teams.len(),
            context.allocations.len(),
            upgraded
        );
        Ok(context)
    }

    fn save_context(&self, context: &PlanningContext) -> RepoResult<()> {
        context.financial_config.validate()?;

        let tx = self.conn.unchecked_transaction()?;
        write_collection(&tx, CollectionKey::Skills, &context.skills)?;
        write_collection(&tx, CollectionKey::Solutions, &context.solutions)?;
        write_collection(&tx, CollectionKey::Projects, &context.projects)?;
        write_collection(&tx, CollectionKey::ProjectSkills, &context.project_skills)?;
        write_collection(&tx, CollectionKey::ProjectSolutions, &context.project_solutions)?;
        write_collection(&tx, CollectionKey::Epics, &context.epics)?;
        write_collection(&tx, CollectionKey::Teams, &context.teams)?;
        write_collection(&tx, CollectionKey::Divisions, &context.divisions)?;
        write_collection(&tx, CollectionKey::DivisionBudgets, &context.division_budgets)?;
        write_collection(&tx, CollectionKey::People, &context.people)?;
        write_collection(&tx, CollectionKey::PersonSkills, &context.person_skills)?;
        write_collection(&tx, CollectionKey::Roles, &context.roles)?;
        write_collection(&tx, CollectionKey::Cycles, &context.cycles)?;
        write_collection(&tx, CollectionKey::Allocations, &context.allocations)?;
        write_collection(
            &tx,
            CollectionKey::RunWorkCategories,
            &context.run_work_categories,
        )?;
        write_payload(
            &tx,
            CollectionKey::FinancialConfig,
            &serde_json::to_string(&context.financial_config)?,
            1,
        )?;
        tx.commit()?;

        info!(
            "event=context_save module=repo status=ok projects={} teams={} allocations={}",
            context.projects.len(),
            context.teams.len(),
            context.allocations.len()
        );
        Ok(())
    }

    fn save_collection<T: Serialize + Validate>(
        &self,
        key: CollectionKey,
        items: &[T],
    ) -> RepoResult<()> {
        if key == CollectionKey::FinancialConfig {
            return Err(RepoError::InvalidData(
                "financial_config is a single record; save it through save_context".to_string(),
            ));
        }
        write_collection(self.conn, key, items)
    }

    fn collection_counts(&self) -> RepoResult<Vec<(CollectionKey, u64)>> {
        let mut stmt = self.conn.prepare(
            "SELECT collection, item_count
             FROM planning_collections
             ORDER BY collection ASC;",
        )?;
        let mut rows = stmt.query([])?;
        let mut counts = Vec::new();

        while let Some(row) = rows.next()? {
            let name: String = row.get("collection")?;
            let key = CollectionKey::parse(&name).ok_or_else(|| {
                RepoError::InvalidData(format!(
                    "unknown collection `{name}` in planning_collections.collection"
                ))
            })?;
            let count: i64 = row.get("item_count")?;
            let count = u64::try_from(count).map_err(|_| {
                RepoError::InvalidData(format!("negative item_count `{count}` for `{name}`"))
            })?;
            counts.push((key, count));
        }

        Ok(counts)
    }
}

fn write_collection<T: Serialize + Validate>(
    conn: &Connection,
    key: CollectionKey,
    items: &[T],
) -> RepoResult<()> {
    for item in items {
        item.validate()?;
    }
    let payload = serde_json::to_string(items)?;
    write_payload(conn, key, &payload, items.len())
}

fn write_payload(
    conn: &Connection,
    key: CollectionKey,
    payload: &str,
    item_count: usize,
) -> RepoResult<()> {
    let item_count = i64::try_from(item_count)
        .map_err(|_| RepoError::InvalidData(format!("collection `{}` too large", key.as_str())))?;
    conn.execute(
        "INSERT INTO planning_collections (
            collection,
            payload,
            item_count,
            payload_format,
            updated_at
        ) VALUES (?1, ?2, ?3, ?4, (strftime('%s', 'now') * 1000))
        ON CONFLICT(collection) DO UPDATE SET
            payload = excluded.payload,
            item_count = excluded.item_count,
            payload_format = excluded.payload_format,
            updated_at = excluded.updated_at;",
        params![key.as_str(), payload, item_count, PAYLOAD_FORMAT],
    )?;
    Ok(())
}

fn read_collection<T: DeserializeOwned>(
    conn: &Connection,
    key: CollectionKey,
) -> RepoResult<Vec<T>> {
    Ok(read_payload(conn, key)?.unwrap_or_default())
}

fn read_payload<T: DeserializeOwned>(conn: &Connection, key: CollectionKey) -> RepoResult<Option<T>> {
    let row = conn
        .query_row(
            "SELECT payload, payload_format
             FROM planning_collections
             WHERE collection = ?1;",
            [key.as_str()],
            |row| Ok((row.get::<_, String>(0)?, row.get::<_, i64>(1)?)),
        )
        .optional()?;

    let Some((payload, format)) = row else {
        return Ok(None);
    };
    if format > PAYLOAD_FORMAT {
        return Err(RepoError::InvalidData(format!(
            "collection `{}` uses payload format {format}, newer than supported {PAYLOAD_FORMAT}",
            key.as_str()
        )));
    }

    serde_json::from_str(&payload).map(Some).map_err(|err| {
        RepoError::InvalidData(format!(
            "collection `{}` payload cannot be decoded: {err}",
            key.as_str()
        ))
    })
}

/// Re-tags manual project skills whose notes carry legacy solution provenance.
fn upgrade_legacy_provenance(context: &mut PlanningContext) -> usize {
    let mut upgraded = 0;
    for link in context
        .project_skills
        .iter_mut()
        .filter(|link| !link.is_derived())
    {
        let source = infer_legacy_source(link.notes.as_deref(), &context.solutions);
        if source.solution_id().is_some() {
            link.source = source;
            upgraded += 1;
        }
    }
    upgraded
}
