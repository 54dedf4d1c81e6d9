//! The relational view engine: in-memory copies of the five collections,
//! joined read views over them, and writes forwarded to the records API.
//!
//! State is only ever replaced with freshly fetched collections. Every
//! successful mutation re-fetches the collection it touched; failed
//! operations leave the previous state in place.

use std::collections::HashMap;
use std::sync::Arc;

use tokio::sync::{Mutex, RwLock};
use tracing::{debug, error, info, warn};

use crate::api::{self, RecordsApi};
use crate::error::{ClassbookError, Result};
use crate::models::class::Class;
use crate::models::common::{Collection, EntityId, GradeKind};
use crate::models::course::Course;
use crate::models::enrollment::Enrollment;
use crate::models::grade::{validate_grade_value, Grade, NewGrade};
use crate::models::student::Student;
use crate::models::{Collections, Counts, Draft, Entity};
use crate::views::{
    self, Average, ClassWithCourse, GradePair, RosterEntry, StudentDetail, StudentWithClass,
};

type UpsertKey = (EntityId, GradeKind);

/// Holds the loaded collections and mediates every read and write.
pub struct RecordsEngine<A: RecordsApi> {
    api: A,
    state: RwLock<Collections>,
    upsert_locks: Mutex<HashMap<UpsertKey, Arc<Mutex<()>>>>,
}

impl<A: RecordsApi> RecordsEngine<A> {
    pub fn new(api: A) -> Self {
        Self {
            api,
            state: RwLock::new(Collections::default()),
            upsert_locks: Mutex::new(HashMap::new()),
        }
    }

    /// The underlying API collaborator.
    pub fn api(&self) -> &A {
        &self.api
    }

    /// Fetch all five collections concurrently and replace the local state.
    ///
    /// All or nothing: if any fetch fails the error is returned and the
    /// previously loaded state stays as it was.
    pub async fn load_all(&self) -> Result<Collections> {
        debug!("Loading all collections");
        let fetched = tokio::try_join!(
            self.fetch_all::<Course>(),
            self.fetch_all::<Class>(),
            self.fetch_all::<Student>(),
            self.fetch_all::<Enrollment>(),
            self.fetch_all::<Grade>(),
        );

        let (courses, classes, students, enrollments, grades) = match fetched {
            Ok(rows) => rows,
            Err(e) => {
                error!(error = %e, "Refresh failed, keeping previous state");
                return Err(e);
            }
        };

        let collections = Collections {
            courses,
            classes,
            students,
            enrollments,
            grades,
        };
        let counts = collections.counts();
        info!(
            courses = counts.courses,
            classes = counts.classes,
            students = counts.students,
            enrollments = counts.enrollments,
            grades = counts.grades,
            "Loaded collections"
        );

        *self.state.write().await = collections.clone();
        Ok(collections)
    }

    /// Re-fetch a single collection and replace it in the local state.
    pub async fn reload(&self, collection: Collection) -> Result<()> {
        let result = match collection {
            Collection::Courses => self.reload_rows::<Course>().await,
            Collection::Classes => self.reload_rows::<Class>().await,
            Collection::Students => self.reload_rows::<Student>().await,
            Collection::Enrollments => self.reload_rows::<Enrollment>().await,
            Collection::Grades => self.reload_rows::<Grade>().await,
        };
        if let Err(e) = &result {
            error!(collection = %collection, error = %e, "Reload failed, keeping previous state");
        }
        result
    }

    async fn reload_rows<E: Entity>(&self) -> Result<()> {
        let rows = self.fetch_all::<E>().await?;
        debug!(collection = %E::COLLECTION, count = rows.len(), "Reloaded collection");
        *E::rows_mut(&mut *self.state.write().await) = rows;
        Ok(())
    }

    async fn fetch_all<E: Entity>(&self) -> Result<Vec<E>> {
        let rows = self.api.list(E::COLLECTION, &[]).await?;
        api::decode_rows(E::COLLECTION, rows)
    }

    /// A copy of everything currently loaded.
    pub async fn snapshot(&self) -> Collections {
        self.state.read().await.clone()
    }

    pub async fn counts(&self) -> Counts {
        self.state.read().await.counts()
    }

    pub async fn classes_with_course_name(&self) -> Vec<ClassWithCourse> {
        let state = self.state.read().await;
        views::classes_with_course_name(&state.classes, &state.courses)
    }

    pub async fn students_with_class_name(&self) -> Vec<StudentWithClass> {
        let state = self.state.read().await;
        views::students_with_class_name(&state.students, &state.classes)
    }

    pub async fn students_in_class(&self, class_id: EntityId) -> Vec<Student> {
        let state = self.state.read().await;
        views::students_in_class(class_id, &state.enrollments, &state.students)
    }

    pub async fn grades_for(&self, enrollment_id: EntityId) -> GradePair {
        let state = self.state.read().await;
        views::grades_for(enrollment_id, &state.grades)
    }

    pub async fn class_roster(&self, class_id: EntityId) -> Vec<RosterEntry> {
        let state = self.state.read().await;
        views::class_roster(class_id, &state.enrollments, &state.students, &state.grades)
    }

    pub fn average(exam: Option<f64>, work: Option<f64>) -> Average {
        views::average(exam, work)
    }

    /// A student fetched fresh from the API, with enrollments, class labels
    /// and grades taken from the loaded state. `None` if the API has no such student.
    pub async fn student_detail(&self, student_id: EntityId) -> Result<Option<StudentDetail>> {
        let Some(student) = self.fetch::<Student>(student_id).await? else {
            return Ok(None);
        };
        let state = self.state.read().await;
        let enrollments = views::enrollment_details(
            student_id,
            &state.enrollments,
            &state.classes,
            &state.grades,
        );
        Ok(Some(StudentDetail {
            student,
            enrollments,
        }))
    }

    /// Fetch a single record by id.
    pub async fn fetch<E: Entity>(&self, id: EntityId) -> Result<Option<E>> {
        match self.api.get(E::COLLECTION, id).await? {
            Some(row) => {
                let mut decoded = api::decode_rows(E::COLLECTION, vec![row])?;
                Ok(decoded.pop())
            }
            None => Ok(None),
        }
    }

    /// Validate and create a record, then reload its collection.
    pub async fn create<E: Entity>(&self, draft: E::Draft) -> Result<E> {
        draft.validate()?;
        let body = api::encode_body(E::COLLECTION, None, &draft)?;
        let row = self.api.create(E::COLLECTION, body).await.map_err(|e| {
            error!(collection = %E::COLLECTION, error = %e, "Create failed");
            e
        })?;
        let created: E = api::decode_written(E::COLLECTION, None, row)?;
        info!(collection = %E::COLLECTION, id = created.id(), "Created record");
        self.refresh_after_write(E::COLLECTION).await;
        Ok(created)
    }

    /// Validate and fully replace a record, then reload its collection.
    pub async fn update<E: Entity>(&self, id: EntityId, draft: E::Draft) -> Result<E> {
        draft.validate()?;
        let body = api::encode_body(E::COLLECTION, Some(id), &draft)?;
        let row = self.api.update(E::COLLECTION, id, body).await.map_err(|e| {
            error!(collection = %E::COLLECTION, id, error = %e, "Update failed");
            e
        })?;
        let updated: E = api::decode_written(E::COLLECTION, Some(id), row)?;
        info!(collection = %E::COLLECTION, id, "Updated record");
        self.refresh_after_write(E::COLLECTION).await;
        Ok(updated)
    }

    /// Delete a record once `confirm` approves it.
    ///
    /// `confirm` receives the locally loaded copy (if any). When it returns
    /// `false` no request is issued and `Ok(false)` is returned. Deleting a
    /// record never deletes the records that reference it.
    pub async fn delete<E, F>(&self, id: EntityId, confirm: F) -> Result<bool>
    where
        E: Entity,
        F: FnOnce(Option<&E>) -> bool,
    {
        let approved = {
            let state = self.state.read().await;
            confirm(state.find::<E>(id))
        };
        if !approved {
            debug!(collection = %E::COLLECTION, id, "Deletion not confirmed");
            return Ok(false);
        }

        self.api.delete(E::COLLECTION, id).await.map_err(|e| {
            error!(collection = %E::COLLECTION, id, error = %e, "Delete failed");
            e
        })?;
        info!(collection = %E::COLLECTION, id, "Deleted record");
        self.refresh_after_write(E::COLLECTION).await;
        Ok(true)
    }

    /// Reload `collection` after a write the API has already accepted.
    ///
    /// A failed reload does not fail the write: the previous rows stay in
    /// place until the next successful reload.
    async fn refresh_after_write(&self, collection: Collection) {
        if let Err(e) = self.reload(collection).await {
            warn!(
                collection = %collection,
                error = %e,
                "Write succeeded but refresh failed, local state is stale"
            );
        }
    }

    /// Set the `kind` grade of an enrollment, creating it if none exists.
    ///
    /// Out-of-range values fail before any request. Upserts on the same
    /// `(enrollment_id, kind)` through this engine run one at a time, so they
    /// cannot both observe a missing grade and create duplicates.
    pub async fn upsert_grade(
        &self,
        enrollment_id: EntityId,
        kind: GradeKind,
        value: f64,
    ) -> Result<Grade> {
        validate_grade_value(value)?;
        if enrollment_id <= 0 {
            return Err(ClassbookError::Validation(
                "enrollment_id must reference an existing record".into(),
            ));
        }

        let key = (enrollment_id, kind);
        let key_lock = {
            let mut locks = self.upsert_locks.lock().await;
            Arc::clone(locks.entry(key).or_default())
        };
        let result = {
            let _guard = key_lock.lock().await;
            self.write_grade(enrollment_id, kind, value).await
        };
        drop(key_lock);
        self.release_upsert_lock(key).await;
        result
    }

    /// Forget the lock of `key` unless another upsert holds or awaits it.
    async fn release_upsert_lock(&self, key: UpsertKey) {
        let mut locks = self.upsert_locks.lock().await;
        if locks
            .get(&key)
            .is_some_and(|lock| Arc::strong_count(lock) == 1)
        {
            locks.remove(&key);
        }
    }

    async fn write_grade(
        &self,
        enrollment_id: EntityId,
        kind: GradeKind,
        value: f64,
    ) -> Result<Grade> {
        let filter = [
            ("enrollment_id", enrollment_id.to_string()),
            ("kind", kind.as_str().to_string()),
        ];
        let rows = self.api.list(Collection::Grades, &filter).await?;
        // The API may ignore filters it does not understand.
        let existing: Vec<Grade> = api::decode_rows::<Grade>(Collection::Grades, rows)?
            .into_iter()
            .filter(|g| g.enrollment_id == enrollment_id && g.kind == kind)
            .collect();
        if existing.len() > 1 {
            warn!(
                enrollment_id,
                kind = %kind,
                count = existing.len(),
                "Duplicate grades found, updating the first"
            );
        }

        let draft = NewGrade {
            enrollment_id,
            kind,
            value,
        };
        let grade = match existing.into_iter().next() {
            Some(current) => {
                debug!(id = current.id, enrollment_id, kind = %kind, "Replacing grade");
                self.update_grade_row(current.id, &draft).await?
            }
            None => {
                debug!(enrollment_id, kind = %kind, "Creating grade");
                self.create_grade_row(&draft).await?
            }
        };
        info!(id = grade.id, enrollment_id, kind = %kind, value, "Grade saved");

        self.refresh_after_write(Collection::Grades).await;
        Ok(grade)
    }

    async fn create_grade_row(&self, draft: &NewGrade) -> Result<Grade> {
        let body = api::encode_body(Collection::Grades, None, draft)?;
        let row = self.api.create(Collection::Grades, body).await.map_err(|e| {
            error!(error = %e, "Grade create failed");
            e
        })?;
        api::decode_written(Collection::Grades, None, row)
    }

    async fn update_grade_row(&self, id: EntityId, draft: &NewGrade) -> Result<Grade> {
        let body = api::encode_body(Collection::Grades, Some(id), draft)?;
        let row = self.api.update(Collection::Grades, id, body).await.map_err(|e| {
            error!(id, error = %e, "Grade update failed");
            e
        })?;
        api::decode_written(Collection::Grades, Some(id), row)
    }
}
