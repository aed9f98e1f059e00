use async_trait::async_trait;
use futures::TryStreamExt;
use mongodb::{
    bson::{self, doc},
    options::{FindOneAndUpdateOptions, IndexOptions, ReturnDocument},
    Client as MongoClient, Collection, Database, IndexModel,
};

use super::{
    AccountStore, GroupStore, MemberStore, SessionStore, StoreError, StoreHealth,
};
use crate::models::{Account, Group, Member, Right, Session};

/// MongoDB-backed stores for all four collections.
#[derive(Clone)]
pub struct MongoDb {
    client: MongoClient,
    db: Database,
}

impl MongoDb {
    pub async fn connect(uri: &str, database: &str) -> Result<Self, StoreError> {
        tracing::info!(uri = %uri, "Connecting to MongoDB");
        let client = MongoClient::with_uri_str(uri).await.map_err(|e| {
            tracing::error!("Failed to connect to MongoDB at {}: {}", uri, e);
            StoreError::from(e)
        })?;
        let db = client.database(database);
        tracing::info!(database = %database, "Successfully connected to MongoDB database");
        Ok(Self { client, db })
    }

    pub async fn initialize_indexes(&self) -> Result<(), StoreError> {
        tracing::info!("Creating MongoDB indexes for access-service");

        let unique_email = IndexModel::builder()
            .keys(doc! { "email": 1 })
            .options(
                IndexOptions::builder()
                    .name("email_unique".to_string())
                    .unique(true)
                    .build(),
            )
            .build();
        self.accounts().create_index(unique_email, None).await?;
        tracing::info!("Created unique index on accounts.email");

        let token_index = IndexModel::builder()
            .keys(doc! { "token": 1 })
            .options(
                IndexOptions::builder()
                    .name("token_lookup".to_string())
                    .unique(true)
                    .build(),
            )
            .build();
        self.sessions().create_index(token_index, None).await?;
        tracing::info!("Created unique index on sessions.token");

        // The permission check always filters by (group, account); the
        // singular membership lookup filters by account alone.
        let member_index = IndexModel::builder()
            .keys(doc! { "group": 1, "account": 1 })
            .options(
                IndexOptions::builder()
                    .name("group_account_lookup".to_string())
                    .build(),
            )
            .build();
        self.members().create_index(member_index, None).await?;

        let member_account_index = IndexModel::builder()
            .keys(doc! { "account": 1 })
            .options(
                IndexOptions::builder()
                    .name("account_lookup".to_string())
                    .build(),
            )
            .build();
        self.members().create_index(member_account_index, None).await?;
        tracing::info!("Created indexes on members.(group, account) and members.account");

        Ok(())
    }

    pub fn accounts(&self) -> Collection<Account> {
        self.db.collection("accounts")
    }

    pub fn sessions(&self) -> Collection<Session> {
        self.db.collection("sessions")
    }

    pub fn groups(&self) -> Collection<Group> {
        self.db.collection("groups")
    }

    pub fn members(&self) -> Collection<Member> {
        self.db.collection("members")
    }
}

#[async_trait]
impl StoreHealth for MongoDb {
    async fn health_check(&self) -> Result<(), StoreError> {
        self.client
            .database("admin")
            .run_command(doc! { "ping": 1 }, None)
            .await
            .map_err(|e| {
                tracing::error!("MongoDB health check failed: {}", e);
                StoreError::from(e)
            })?;
        Ok(())
    }
}

#[async_trait]
impl AccountStore for MongoDb {
    async fn insert(&self, account: &Account) -> Result<(), StoreError> {
        self.accounts().insert_one(account, None).await?;
        Ok(())
    }

    async fn find_by_id(&self, id: &str) -> Result<Option<Account>, StoreError> {
        Ok(self.accounts().find_one(doc! { "_id": id }, None).await?)
    }

    async fn find_by_email(&self, email: &str) -> Result<Option<Account>, StoreError> {
        Ok(self.accounts().find_one(doc! { "email": email }, None).await?)
    }

    async fn find_active_by_email(&self, email: &str) -> Result<Option<Account>, StoreError> {
        Ok(self
            .accounts()
            .find_one(doc! { "email": email, "active": true }, None)
            .await?)
    }

    async fn find_active_by_username(&self, username: &str) -> Result<Option<Account>, StoreError> {
        Ok(self
            .accounts()
            .find_one(doc! { "username": username, "active": true }, None)
            .await?)
    }

    async fn find_by_application(&self, application: &str) -> Result<Option<Account>, StoreError> {
        Ok(self
            .accounts()
            .find_one(doc! { "applications": { "$in": [application] } }, None)
            .await?)
    }

    async fn activate_by_code(&self, code: &str) -> Result<Option<Account>, StoreError> {
        let options = FindOneAndUpdateOptions::builder()
            .return_document(ReturnDocument::After)
            .build();
        Ok(self
            .accounts()
            .find_one_and_update(
                doc! { "activation_code": code },
                doc! { "$set": { "active": true } },
                options,
            )
            .await?)
    }
}

#[async_trait]
impl SessionStore for MongoDb {
    async fn insert(&self, session: &Session) -> Result<(), StoreError> {
        self.sessions().insert_one(session, None).await?;
        Ok(())
    }

    async fn find_by_token(&self, token: &str) -> Result<Option<Session>, StoreError> {
        Ok(self.sessions().find_one(doc! { "token": token }, None).await?)
    }
}

#[async_trait]
impl GroupStore for MongoDb {
    async fn insert(&self, group: &Group) -> Result<(), StoreError> {
        self.groups().insert_one(group, None).await?;
        Ok(())
    }

    async fn find_by_id(&self, id: &str) -> Result<Option<Group>, StoreError> {
        Ok(self.groups().find_one(doc! { "_id": id }, None).await?)
    }

    async fn find_all(&self) -> Result<Vec<Group>, StoreError> {
        let cursor = self.groups().find(doc! {}, None).await?;
        Ok(cursor.try_collect().await?)
    }

    async fn update(&self, group: &Group) -> Result<Option<Group>, StoreError> {
        let options = FindOneAndUpdateOptions::builder()
            .return_document(ReturnDocument::After)
            .build();
        Ok(self
            .groups()
            .find_one_and_update(
                doc! { "_id": &group.id },
                doc! { "$set": {
                    "name": &group.name,
                    "business_code": &group.business_code,
                    "address": &group.address,
                    "domains": &group.domains,
                    "updated_at": bson::DateTime::from_chrono(group.updated_at),
                } },
                options,
            )
            .await?)
    }

    async fn delete_by_id(&self, id: &str) -> Result<Option<Group>, StoreError> {
        Ok(self.groups().find_one_and_delete(doc! { "_id": id }, None).await?)
    }
}

#[async_trait]
impl MemberStore for MongoDb {
    async fn insert(&self, member: &Member) -> Result<(), StoreError> {
        self.members().insert_one(member, None).await?;
        Ok(())
    }

    async fn find_by_account(&self, account_id: &str) -> Result<Option<Member>, StoreError> {
        Ok(self
            .members()
            .find_one(doc! { "account": account_id }, None)
            .await?)
    }

    async fn find_by_group_and_account(
        &self,
        group_id: &str,
        account_id: &str,
    ) -> Result<Option<Member>, StoreError> {
        Ok(self
            .members()
            .find_one(doc! { "group": group_id, "account": account_id }, None)
            .await?)
    }

    async fn find_by_group(&self, group_id: &str) -> Result<Vec<Member>, StoreError> {
        let cursor = self.members().find(doc! { "group": group_id }, None).await?;
        Ok(cursor.try_collect().await?)
    }

    async fn update_rights(
        &self,
        group_id: &str,
        account_id: &str,
        rights: &[Right],
    ) -> Result<Option<Member>, StoreError> {
        let rights = bson::to_bson(rights)?;
        let options = FindOneAndUpdateOptions::builder()
            .return_document(ReturnDocument::After)
            .build();
        Ok(self
            .members()
            .find_one_and_update(
                doc! { "group": group_id, "account": account_id },
                doc! { "$set": {
                    "rights": rights,
                    "updated_at": bson::DateTime::from_chrono(chrono::Utc::now()),
                } },
                options,
            )
            .await?)
    }

    async fn delete(
        &self,
        group_id: &str,
        account_id: &str,
    ) -> Result<Option<Member>, StoreError> {
        Ok(self
            .members()
            .find_one_and_delete(doc! { "group": group_id, "account": account_id }, None)
            .await?)
    }
}
