use anyhow::Result;
use chrono::NaiveDate;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, DeleteResult, EntityTrait, PaginatorTrait,
    QueryFilter, QueryOrder, QuerySelect, Set, TransactionTrait,
};

use crate::entities::sea_orm_active_enums::RoleEnum;
use crate::entities::{account, student};
use crate::static_service::DATABASE_CONNECTION;

#[derive(Debug, Default, Clone)]
pub struct StudentFilter {
    pub student_id: Option<String>,
    pub full_name: Option<String>,
    pub class_section: Option<String>,
    pub department: Option<String>,
}

/// A student together with the bcrypt hash for its new account.
#[derive(Debug, Clone)]
pub struct NewStudent {
    pub student_id: String,
    pub full_name: String,
    pub hashed_password: String,
    pub birth_date: Option<NaiveDate>,
    pub class_section: Option<String>,
    pub department: Option<String>,
    pub email: Option<String>,
    pub location: Option<String>,
}

#[derive(Default)]
pub struct StudentUpdate {
    pub full_name: Option<String>,
    pub birth_date: Option<Option<NaiveDate>>,
    pub class_section: Option<Option<String>>,
    pub department: Option<Option<String>>,
    pub email: Option<Option<String>>,
    pub location: Option<Option<String>>,
}

pub struct StudentRepository;

impl StudentRepository {
    pub fn new() -> Self {
        Self
    }

    pub fn get_connection(&self) -> &'static DatabaseConnection {
        DATABASE_CONNECTION
            .get()
            .expect("DATABASE_CONNECTION not set")
    }

    pub async fn find_by_id(&self, student_id: &str) -> Result<Option<student::Model>> {
        let db = self.get_connection();
        let found = student::Entity::find_by_id(student_id).one(db).await?;
        Ok(found)
    }

    pub async fn find_by_email(&self, email: &str) -> Result<Option<student::Model>> {
        let db = self.get_connection();
        let found = student::Entity::find()
            .filter(student::Column::Email.eq(email))
            .one(db)
            .await?;
        Ok(found)
    }

    pub async fn find_all(&self, filter: StudentFilter) -> Result<Vec<student::Model>> {
        let db = self.get_connection();
        let mut query = student::Entity::find();

        if let Some(student_id) = filter.student_id {
            query = query.filter(student::Column::StudentId.contains(&student_id));
        }
        if let Some(full_name) = filter.full_name {
            query = query.filter(student::Column::FullName.contains(&full_name));
        }
        if let Some(class_section) = filter.class_section {
            query = query.filter(student::Column::ClassSection.eq(class_section));
        }
        if let Some(department) = filter.department {
            query = query.filter(student::Column::Department.eq(department));
        }

        let students = query
            .order_by_asc(student::Column::StudentId)
            .all(db)
            .await?;
        Ok(students)
    }

    pub async fn find_by_section(&self, class_section: &str) -> Result<Vec<student::Model>> {
        let db = self.get_connection();
        let students = student::Entity::find()
            .filter(student::Column::ClassSection.eq(class_section))
            .order_by_asc(student::Column::StudentId)
            .all(db)
            .await?;
        Ok(students)
    }

    pub async fn distinct_sections(&self) -> Result<Vec<String>> {
        let db = self.get_connection();
        let sections: Vec<Option<String>> = student::Entity::find()
            .select_only()
            .column(student::Column::ClassSection)
            .filter(student::Column::ClassSection.is_not_null())
            .filter(student::Column::ClassSection.ne(""))
            .distinct()
            .order_by_asc(student::Column::ClassSection)
            .into_tuple()
            .all(db)
            .await?;
        Ok(sections.into_iter().flatten().collect())
    }

    /// Account and student rows are inserted in one transaction; a failure on
    /// either leaves the store unchanged.
    pub async fn create(&self, new_student: NewStudent) -> Result<student::Model> {
        let db = self.get_connection();
        let now = chrono::Utc::now().naive_utc();
        let txn = db.begin().await?;

        let account_model = account::ActiveModel {
            username: Set(new_student.student_id.clone()),
            password: Set(new_student.hashed_password),
            role: Set(RoleEnum::Student),
            created_at: Set(now),
        };
        account_model.insert(&txn).await?;

        let student_model = student::ActiveModel {
            student_id: Set(new_student.student_id),
            full_name: Set(new_student.full_name),
            birth_date: Set(new_student.birth_date),
            class_section: Set(new_student.class_section),
            department: Set(new_student.department),
            email: Set(new_student.email),
            location: Set(new_student.location),
        };
        let created = student_model.insert(&txn).await?;

        txn.commit().await?;
        Ok(created)
    }

    /// Bulk insert from a spreadsheet; the whole batch is one transaction.
    pub async fn create_many(&self, new_students: Vec<NewStudent>) -> Result<usize> {
        let db = self.get_connection();
        let now = chrono::Utc::now().naive_utc();
        let txn = db.begin().await?;

        let total = new_students.len();
        for new_student in new_students {
            let account_model = account::ActiveModel {
                username: Set(new_student.student_id.clone()),
                password: Set(new_student.hashed_password),
                role: Set(RoleEnum::Student),
                created_at: Set(now),
            };
            account_model.insert(&txn).await?;

            let student_model = student::ActiveModel {
                student_id: Set(new_student.student_id),
                full_name: Set(new_student.full_name),
                birth_date: Set(new_student.birth_date),
                class_section: Set(new_student.class_section),
                department: Set(new_student.department),
                email: Set(new_student.email),
                location: Set(new_student.location),
            };
            student_model.insert(&txn).await?;
        }

        txn.commit().await?;
        Ok(total)
    }

    pub async fn update(&self, student_id: &str, updates: StudentUpdate) -> Result<student::Model> {
        let student = self
            .find_by_id(student_id)
            .await?
            .ok_or_else(|| anyhow::anyhow!("Student not found"))?;
        let db = self.get_connection();

        let mut active: student::ActiveModel = student.into();

        if let Some(full_name) = updates.full_name {
            active.full_name = Set(full_name);
        }
        if let Some(birth_date) = updates.birth_date {
            active.birth_date = Set(birth_date);
        }
        if let Some(class_section) = updates.class_section {
            active.class_section = Set(class_section);
        }
        if let Some(department) = updates.department {
            active.department = Set(department);
        }
        if let Some(email) = updates.email {
            active.email = Set(email);
        }
        if let Some(location) = updates.location {
            active.location = Set(location);
        }

        let result = active.update(db).await?;
        Ok(result)
    }

    /// Deleting the account row removes the student and its scores through
    /// the ON DELETE CASCADE chain, all in one statement.
    pub async fn delete(&self, student_id: &str) -> Result<DeleteResult> {
        let db = self.get_connection();
        let result = account::Entity::delete_by_id(student_id).exec(db).await?;
        Ok(result)
    }

    pub async fn existing_ids(&self, candidate_ids: Vec<String>) -> Result<Vec<String>> {
        let db = self.get_connection();
        if candidate_ids.is_empty() {
            return Ok(Vec::new());
        }

        let existing: Vec<String> = account::Entity::find()
            .select_only()
            .column(account::Column::Username)
            .filter(account::Column::Username.is_in(candidate_ids))
            .into_tuple()
            .all(db)
            .await?;
        Ok(existing)
    }

    pub async fn is_email_taken(&self, email: &str, exclude_student_id: &str) -> Result<bool> {
        let db = self.get_connection();
        let count = student::Entity::find()
            .filter(student::Column::Email.eq(email))
            .filter(student::Column::StudentId.ne(exclude_student_id))
            .count(db)
            .await?;
        Ok(count > 0)
    }

    pub async fn count(&self) -> Result<u64> {
        let db = self.get_connection();
        let total = student::Entity::find().count(db).await?;
        Ok(total)
    }
}
