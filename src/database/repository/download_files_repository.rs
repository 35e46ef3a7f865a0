//! 下载文件数据仓库

use sea_orm::sea_query::Expr;
use sea_orm::*;
use serde::Serialize;

use super::{UserSummary, contains_insensitive, dedup_ids, non_empty};
use crate::database::dto::DownloadFileFields;
use crate::database::pagination::OffsetInput;
use crate::entity::prelude::*;
use crate::entity::sea_orm_active_enums::{DownloadType, Language, Status};
use crate::entity::{download_download_files, download_file_authors, download_files, downloads};
use crate::utils::{new_id, now_millis, text::slugify};

const SEARCH_LIMIT: u64 = 10;

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DownloadFileDetail {
    #[serde(flatten)]
    pub file: download_files::Model,
    pub authors: Vec<UserSummary>,
}

/// 站点地图中文件所属的下载
#[derive(Debug, Clone, Serialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct ParentDownload {
    pub slug: String,
    pub r#type: DownloadType,
    pub language: Language,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DownloadFileSitemapItem {
    pub version_slug: String,
    pub updated_at: i64,
    pub downloads: Vec<ParentDownload>,
}

/// 下载文件数据仓库
pub struct DownloadFilesRepository;

impl DownloadFilesRepository {
    // ==================== 查询操作 ====================

    pub async fn find_by_id(
        db: &DatabaseConnection,
        id: &str,
    ) -> Result<Option<DownloadFileDetail>, DbErr> {
        let Some(file) = DownloadFiles::find_by_id(id).one(db).await? else {
            return Ok(None);
        };
        let authors = file
            .find_related(Users)
            .all(db)
            .await?
            .into_iter()
            .map(UserSummary::from)
            .collect();
        Ok(Some(DownloadFileDetail { file, authors }))
    }

    /// 按创建时间倒序的偏移分页
    pub async fn find_page(
        db: &DatabaseConnection,
        page: OffsetInput,
    ) -> Result<Vec<download_files::Model>, DbErr> {
        page.apply(DownloadFiles::find().order_by_desc(download_files::Column::CreatedAt))
            .all(db)
            .await
    }

    /// 后台列表，附带作者
    pub async fn find_dashboard(
        db: &DatabaseConnection,
        page: OffsetInput,
    ) -> Result<Vec<DownloadFileDetail>, DbErr> {
        let files = Self::find_page(db, page).await?;
        let authors = files
            .load_many_to_many(Users, DownloadFileAuthors, db)
            .await?;

        Ok(files
            .into_iter()
            .zip(authors)
            .map(|(file, authors)| DownloadFileDetail {
                file,
                authors: authors.into_iter().map(UserSummary::from).collect(),
            })
            .collect())
    }

    /// 某个下载下指定 versionSlug 的文件
    pub async fn find_by_download_and_version(
        db: &DatabaseConnection,
        download_id: &str,
        version_slug: &str,
    ) -> Result<Option<download_files::Model>, DbErr> {
        DownloadFiles::find()
            .join(
                JoinType::InnerJoin,
                download_files::Relation::DownloadDownloadFiles.def(),
            )
            .filter(download_download_files::Column::DownloadId.eq(download_id))
            .filter(download_files::Column::VersionSlug.eq(version_slug))
            .order_by_desc(download_files::Column::CreatedAt)
            .one(db)
            .await
    }

    /// 站点地图：文件及其所属的已发布下载
    pub async fn find_sitemap(
        db: &DatabaseConnection,
        page: OffsetInput,
    ) -> Result<Vec<DownloadFileSitemapItem>, DbErr> {
        let files = Self::find_page(db, page).await?;
        let parents = files
            .load_many_to_many(Downloads, DownloadDownloadFiles, db)
            .await?;

        Ok(files
            .into_iter()
            .zip(parents)
            .map(|(file, parents)| DownloadFileSitemapItem {
                version_slug: file.version_slug,
                updated_at: file.updated_at,
                downloads: parents
                    .into_iter()
                    .filter(|d: &downloads::Model| d.status == Status::Published)
                    .map(|d| ParentDownload {
                        slug: d.slug,
                        r#type: d.r#type,
                        language: d.language,
                    })
                    .collect(),
            })
            .collect())
    }

    pub async fn count(db: &DatabaseConnection) -> Result<u64, DbErr> {
        DownloadFiles::find().count(db).await
    }

    /// 按标题、版本或下载链接搜索
    pub async fn search(
        db: &DatabaseConnection,
        query: &str,
    ) -> Result<Vec<download_files::Model>, DbErr> {
        DownloadFiles::find()
            .filter(
                Condition::any()
                    .add(contains_insensitive(
                        (DownloadFiles, download_files::Column::Title),
                        query,
                    ))
                    .add(contains_insensitive(
                        (DownloadFiles, download_files::Column::Version),
                        query,
                    ))
                    .add(contains_insensitive(
                        (DownloadFiles, download_files::Column::DownloadLink),
                        query,
                    )),
            )
            .order_by_desc(download_files::Column::CreatedAt)
            .limit(SEARCH_LIMIT)
            .all(db)
            .await
    }

    // ==================== 写操作 ====================

    pub async fn create(
        db: &DatabaseConnection,
        fields: DownloadFileFields,
    ) -> Result<download_files::Model, DbErr> {
        let txn = db.begin().await?;
        let now = now_millis();

        let file = download_files::ActiveModel {
            id: Set(new_id()),
            title: Set(fields.title.clone()),
            version: Set(fields.version.clone()),
            version_slug: Set(Self::version_slug(&fields)),
            download_link: Set(fields.download_link.clone()),
            file_size: Set(fields.file_size.clone()),
            views: Set(0),
            created_at: Set(now),
            updated_at: Set(now),
        }
        .insert(&txn)
        .await?;

        Self::link_authors(&txn, &file.id, &fields.authors).await?;

        txn.commit().await?;
        Ok(file)
    }

    pub async fn update(
        db: &DatabaseConnection,
        id: &str,
        fields: DownloadFileFields,
    ) -> Result<Option<download_files::Model>, DbErr> {
        let txn = db.begin().await?;

        let Some(existing) = DownloadFiles::find_by_id(id).one(&txn).await? else {
            return Ok(None);
        };

        let mut active: download_files::ActiveModel = existing.into();
        active.title = Set(fields.title.clone());
        active.version = Set(fields.version.clone());
        active.version_slug = Set(Self::version_slug(&fields));
        active.download_link = Set(fields.download_link.clone());
        active.file_size = Set(fields.file_size.clone());
        active.updated_at = Set(now_millis());
        let file = active.update(&txn).await?;

        DownloadFileAuthors::delete_many()
            .filter(download_file_authors::Column::DownloadFileId.eq(id))
            .exec(&txn)
            .await?;
        Self::link_authors(&txn, id, &fields.authors).await?;

        txn.commit().await?;
        Ok(Some(file))
    }

    /// 删除文件，先移除与下载、作者的关联行
    pub async fn delete(db: &DatabaseConnection, id: &str) -> Result<bool, DbErr> {
        let txn = db.begin().await?;

        DownloadDownloadFiles::delete_many()
            .filter(download_download_files::Column::DownloadFileId.eq(id))
            .exec(&txn)
            .await?;
        DownloadFileAuthors::delete_many()
            .filter(download_file_authors::Column::DownloadFileId.eq(id))
            .exec(&txn)
            .await?;
        let result = DownloadFiles::delete_by_id(id).exec(&txn).await?;

        txn.commit().await?;
        Ok(result.rows_affected > 0)
    }

    /// 下载次数 +1（单条 UPDATE，无需先读后写）
    pub async fn increment_views(db: &DatabaseConnection, id: &str) -> Result<bool, DbErr> {
        let result = DownloadFiles::update_many()
            .col_expr(
                download_files::Column::Views,
                Expr::col(download_files::Column::Views).add(1),
            )
            .filter(download_files::Column::Id.eq(id))
            .exec(db)
            .await?;
        Ok(result.rows_affected > 0)
    }

    // ==================== 内部辅助 ====================

    /// 未提供 versionSlug 时由版本号生成
    fn version_slug(fields: &DownloadFileFields) -> String {
        non_empty(fields.version_slug.clone())
            .map(|s| slugify(&s))
            .unwrap_or_else(|| slugify(&fields.version))
    }

    async fn link_authors<C>(conn: &C, file_id: &str, authors: &[String]) -> Result<(), DbErr>
    where
        C: ConnectionTrait,
    {
        let rows: Vec<_> = dedup_ids(authors)
            .into_iter()
            .map(|user_id| download_file_authors::ActiveModel {
                download_file_id: Set(file_id.to_string()),
                user_id: Set(user_id),
            })
            .collect();
        if !rows.is_empty() {
            DownloadFileAuthors::insert_many(rows)
                .exec_without_returning(conn)
                .await?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn fields(version_slug: Option<&str>) -> DownloadFileFields {
        DownloadFileFields {
            title: "GIMP 2.10.36".into(),
            version: "2.10.36".into(),
            version_slug: version_slug.map(str::to_string),
            download_link: "https://download.gimp.org/gimp-2.10.36.exe".into(),
            file_size: "250 MB".into(),
            authors: Vec::new(),
        }
    }

    #[test]
    fn version_slug_defaults_to_slugified_version() {
        assert_eq!(DownloadFilesRepository::version_slug(&fields(None)), "2-10-36");
        assert_eq!(DownloadFilesRepository::version_slug(&fields(Some(""))), "2-10-36");
    }

    #[test]
    fn version_slug_respects_explicit_value() {
        assert_eq!(
            DownloadFilesRepository::version_slug(&fields(Some("Latest Beta"))),
            "latest-beta"
        );
    }
}
