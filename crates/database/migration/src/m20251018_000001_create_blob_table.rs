use sea_orm_migration::{prelude::*, schema::*};

const HASH_LENGTH: u32 = 32;

#[derive(DeriveMigrationName)]
pub(crate) struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(Blob::Table)
                    .if_not_exists()
                    .col(big_integer(Blob::StartBlockNumber))
                    .col(big_integer(Blob::EndBlockNumber))
                    .col(big_integer(Blob::StartBlockTime))
                    .col(big_integer(Blob::EndBlockTime))
                    .col(integer(Blob::BatchesCount))
                    .col(small_integer(Blob::Status))
                    .col(binary_len(Blob::BlobHash, HASH_LENGTH))
                    .col(binary_len(Blob::ExpectedShnarf, HASH_LENGTH))
                    .col(binary(Blob::BlobCompressionProof))
                    .primary_key(
                        Index::create().col(Blob::StartBlockNumber).col(Blob::EndBlockNumber),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx_blob_end_block_number")
                    .col(Blob::EndBlockNumber)
                    .table(Blob::Table)
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager.drop_table(Table::drop().table(Blob::Table).to_owned()).await
    }
}

#[derive(DeriveIden)]
enum Blob {
    Table,
    StartBlockNumber,
    EndBlockNumber,
    StartBlockTime,
    EndBlockTime,
    BatchesCount,
    Status,
    BlobHash,
    ExpectedShnarf,
    BlobCompressionProof,
}
