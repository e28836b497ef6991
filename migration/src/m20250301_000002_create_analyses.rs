use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        // 创建学生分析表
        manager
            .create_table(
                Table::create()
                    .table(StudentAnalyses::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(StudentAnalyses::Id)
                            .big_integer()
                            .not_null()
                            .auto_increment()
                            .primary_key(),
                    )
                    .col(
                        ColumnDef::new(StudentAnalyses::StudentId)
                            .string_len(8)
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(StudentAnalyses::AnalysisType)
                            .string_len(50)
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(StudentAnalyses::Title)
                            .string_len(200)
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(StudentAnalyses::Status)
                            .string_len(20)
                            .not_null()
                            .default("pending"),
                    )
                    .col(ColumnDef::new(StudentAnalyses::InputData).text().not_null())
                    .col(ColumnDef::new(StudentAnalyses::AnalysisResult).text().null())
                    .col(ColumnDef::new(StudentAnalyses::AiConfidence).double().null())
                    .col(
                        ColumnDef::new(StudentAnalyses::PromptTemplate)
                            .text()
                            .not_null(),
                    )
                    .col(ColumnDef::new(StudentAnalyses::ActualPrompt).text().null())
                    .col(
                        ColumnDef::new(StudentAnalyses::AnalyzedBy)
                            .string_len(100)
                            .not_null(),
                    )
                    .col(ColumnDef::new(StudentAnalyses::ErrorMessage).text().null())
                    .col(
                        ColumnDef::new(StudentAnalyses::CreatedAt)
                            .big_integer()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(StudentAnalyses::UpdatedAt)
                            .big_integer()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(StudentAnalyses::AnalyzedAt)
                            .big_integer()
                            .null(),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .from(StudentAnalyses::Table, StudentAnalyses::StudentId)
                            .to(Students::Table, Students::StudentId)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        // 创建 AI 服务日志表
        manager
            .create_table(
                Table::create()
                    .table(AiServiceLogs::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(AiServiceLogs::Id)
                            .big_integer()
                            .not_null()
                            .auto_increment()
                            .primary_key(),
                    )
                    .col(
                        ColumnDef::new(AiServiceLogs::RequestType)
                            .string_len(20)
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(AiServiceLogs::StudentAnalysisId)
                            .big_integer()
                            .null(),
                    )
                    .col(ColumnDef::new(AiServiceLogs::RequestPrompt).text().not_null())
                    .col(ColumnDef::new(AiServiceLogs::RequestData).text().not_null())
                    .col(ColumnDef::new(AiServiceLogs::ResponseContent).text().null())
                    .col(ColumnDef::new(AiServiceLogs::ResponseTime).double().null())
                    .col(
                        ColumnDef::new(AiServiceLogs::Status)
                            .string_len(20)
                            .not_null(),
                    )
                    .col(ColumnDef::new(AiServiceLogs::ErrorMessage).text().null())
                    .col(
                        ColumnDef::new(AiServiceLogs::CreatedAt)
                            .big_integer()
                            .not_null(),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .from(AiServiceLogs::Table, AiServiceLogs::StudentAnalysisId)
                            .to(StudentAnalyses::Table, StudentAnalyses::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .if_not_exists()
                    .name("idx_student_analyses_student_type")
                    .table(StudentAnalyses::Table)
                    .col(StudentAnalyses::StudentId)
                    .col(StudentAnalyses::AnalysisType)
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .if_not_exists()
                    .name("idx_student_analyses_status")
                    .table(StudentAnalyses::Table)
                    .col(StudentAnalyses::Status)
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .if_not_exists()
                    .name("idx_ai_service_logs_created_at")
                    .table(AiServiceLogs::Table)
                    .col(AiServiceLogs::CreatedAt)
                    .to_owned(),
            )
            .await?;

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(AiServiceLogs::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(StudentAnalyses::Table).to_owned())
            .await?;
        Ok(())
    }
}

#[derive(DeriveIden)]
enum Students {
    #[sea_orm(iden = "students")]
    Table,
    StudentId,
}

#[derive(DeriveIden)]
enum StudentAnalyses {
    #[sea_orm(iden = "student_analyses")]
    Table,
    Id,
    StudentId,
    AnalysisType,
    Title,
    Status,
    InputData,
    AnalysisResult,
    AiConfidence,
    PromptTemplate,
    ActualPrompt,
    AnalyzedBy,
    ErrorMessage,
    CreatedAt,
    UpdatedAt,
    AnalyzedAt,
}

#[derive(DeriveIden)]
enum AiServiceLogs {
    #[sea_orm(iden = "ai_service_logs")]
    Table,
    Id,
    RequestType,
    StudentAnalysisId,
    RequestPrompt,
    RequestData,
    ResponseContent,
    ResponseTime,
    Status,
    ErrorMessage,
    CreatedAt,
}
