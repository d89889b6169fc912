//! Functions service: functions, executions, variables, deployments.

use serde_json::Value as JsonValue;

use super::{list_params, push_param, AppwriteClient, Params, Upload};
use crate::error::Result;

/// Handle for the Functions API.
#[derive(Clone)]
pub struct Functions {
    client: AppwriteClient,
}

impl Functions {
    /// Wrap a shared client.
    pub fn new(client: AppwriteClient) -> Self {
        Self { client }
    }

    fn function(function_id: &str) -> String {
        format!("/functions/{}", function_id)
    }

    /// `POST /functions`.
    pub async fn create(&self, body: JsonValue) -> Result<JsonValue> {
        self.client.post("/functions", body).await
    }

    /// Fetch one function.
    pub async fn get(&self, function_id: &str) -> Result<JsonValue> {
        self.client.get(&Self::function(function_id), &[]).await
    }

    /// List functions.
    pub async fn list(
        &self,
        queries: Option<&[String]>,
        search: Option<&str>,
    ) -> Result<JsonValue> {
        self.client
            .get("/functions", &list_params(queries, search))
            .await
    }

    /// Replace a function's settings (`PUT`).
    pub async fn update(&self, function_id: &str, body: JsonValue) -> Result<JsonValue> {
        self.client.put(&Self::function(function_id), body).await
    }

    /// Delete a function with its deployments.
    pub async fn delete(&self, function_id: &str) -> Result<JsonValue> {
        self.client.delete(&Self::function(function_id)).await
    }

    /// Runtimes available on this Appwrite instance.
    pub async fn list_runtimes(&self) -> Result<JsonValue> {
        self.client.get("/functions/runtimes", &[]).await
    }

    /// Execute a function. Synchronous unless `async` is set in the body.
    pub async fn create_execution(&self, function_id: &str, body: JsonValue) -> Result<JsonValue> {
        self.client
            .post(&format!("{}/executions", Self::function(function_id)), body)
            .await
    }

    /// Fetch one execution.
    pub async fn get_execution(&self, function_id: &str, execution_id: &str) -> Result<JsonValue> {
        self.client
            .get(
                &format!("{}/executions/{}", Self::function(function_id), execution_id),
                &[],
            )
            .await
    }

    /// List executions of a function.
    pub async fn list_executions(
        &self,
        function_id: &str,
        queries: Option<&[String]>,
        search: Option<&str>,
    ) -> Result<JsonValue> {
        self.client
            .get(
                &format!("{}/executions", Self::function(function_id)),
                &list_params(queries, search),
            )
            .await
    }

    /// Delete an execution log.
    pub async fn delete_execution(
        &self,
        function_id: &str,
        execution_id: &str,
    ) -> Result<JsonValue> {
        self.client
            .delete(&format!(
                "{}/executions/{}",
                Self::function(function_id),
                execution_id
            ))
            .await
    }

    /// Create an environment variable.
    pub async fn create_variable(&self, function_id: &str, body: JsonValue) -> Result<JsonValue> {
        self.client
            .post(&format!("{}/variables", Self::function(function_id)), body)
            .await
    }

    /// Fetch one variable.
    pub async fn get_variable(&self, function_id: &str, variable_id: &str) -> Result<JsonValue> {
        self.client
            .get(
                &format!("{}/variables/{}", Self::function(function_id), variable_id),
                &[],
            )
            .await
    }

    /// List variables of a function.
    pub async fn list_variables(&self, function_id: &str) -> Result<JsonValue> {
        self.client
            .get(&format!("{}/variables", Self::function(function_id)), &[])
            .await
    }

    /// Replace a variable's key and value.
    pub async fn update_variable(
        &self,
        function_id: &str,
        variable_id: &str,
        body: JsonValue,
    ) -> Result<JsonValue> {
        self.client
            .put(
                &format!("{}/variables/{}", Self::function(function_id), variable_id),
                body,
            )
            .await
    }

    /// Delete a variable.
    pub async fn delete_variable(&self, function_id: &str, variable_id: &str) -> Result<JsonValue> {
        self.client
            .delete(&format!(
                "{}/variables/{}",
                Self::function(function_id),
                variable_id
            ))
            .await
    }

    /// Upload a code archive (`code.tar.gz`) as a new deployment.
    pub async fn create_deployment(
        &self,
        function_id: &str,
        code: Vec<u8>,
        activate: bool,
        entrypoint: Option<&str>,
        commands: Option<&str>,
    ) -> Result<JsonValue> {
        let mut fields: Params = vec![("activate".to_string(), activate.to_string())];
        push_param(&mut fields, "entrypoint", entrypoint);
        push_param(&mut fields, "commands", commands);

        self.client
            .upload(
                &format!("{}/deployments", Self::function(function_id)),
                Upload {
                    field: "code",
                    file_name: "code.tar.gz",
                    bytes: code,
                    fields,
                },
            )
            .await
    }

    /// Fetch one deployment.
    pub async fn get_deployment(
        &self,
        function_id: &str,
        deployment_id: &str,
    ) -> Result<JsonValue> {
        self.client
            .get(
                &format!("{}/deployments/{}", Self::function(function_id), deployment_id),
                &[],
            )
            .await
    }

    /// List deployments of a function.
    pub async fn list_deployments(
        &self,
        function_id: &str,
        queries: Option<&[String]>,
        search: Option<&str>,
    ) -> Result<JsonValue> {
        self.client
            .get(
                &format!("{}/deployments", Self::function(function_id)),
                &list_params(queries, search),
            )
            .await
    }

    /// Make a deployment the active one.
    pub async fn update_deployment(
        &self,
        function_id: &str,
        deployment_id: &str,
    ) -> Result<JsonValue> {
        self.client
            .patch(
                &format!("{}/deployments/{}", Self::function(function_id), deployment_id),
                serde_json::json!({}),
            )
            .await
    }

    /// Delete a deployment.
    pub async fn delete_deployment(
        &self,
        function_id: &str,
        deployment_id: &str,
    ) -> Result<JsonValue> {
        self.client
            .delete(&format!(
                "{}/deployments/{}",
                Self::function(function_id),
                deployment_id
            ))
            .await
    }
}
