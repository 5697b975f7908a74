use sea_orm::entity::prelude::*;

#[derive(Clone, Debug, PartialEq, DeriveEntityModel)]
#[sea_orm(table_name = "employees")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i64,
    pub name: String,
    #[sea_orm(unique)]
    pub email: String,
    /// Human-facing identifier, e.g. EMP001
    #[sea_orm(unique)]
    pub employee_code: Option<String>,
    /// ACTIVE, INACTIVE or TERMINATED
    pub status: String,
    pub phone_number: Option<String>,
    pub address: Option<String>,
    pub hire_date: Option<Date>,
    pub salary: Option<f64>,
    pub job_title: Option<String>,
    pub department_id: Option<i64>,
    pub created_at: i64,
    pub updated_at: i64,

    // Optimistic locking counter, checked on every update
    pub version: i64,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::department::Entity",
        from = "Column::DepartmentId",
        to = "super::department::Column::Id"
    )]
    Department,
}

impl Related<super::department::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Department.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
