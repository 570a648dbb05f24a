use crate::app::dto::*;
use crate::app::engine::LineageEngine;
use rmcp::{
    Json, ServerHandler, ServiceExt, handler::server::tool::ToolRouter,
    handler::server::wrapper::Parameters, model::*, tool, tool_handler, tool_router,
    transport::stdio,
};
use tokio::task::spawn_blocking;

#[derive(Clone)]
pub struct LineageMcpServer {
    engine: LineageEngine,
    tool_router: ToolRouter<Self>,
}

impl LineageMcpServer {
    pub fn new(engine: LineageEngine) -> Self {
        Self {
            engine,
            tool_router: Self::tool_router(),
        }
    }

    pub async fn serve_stdio(self) -> anyhow::Result<()> {
        let service = self.serve(stdio()).await?;
        service.waiting().await?;
        Ok(())
    }
}

#[tool_router]
impl LineageMcpServer {
    #[tool(description = "Summarize the loaded lineage records and graph sizes.")]
    async fn health(&self) -> Result<Json<HealthResponse>, String> {
        Ok(Json(self.engine.health()))
    }

    #[tool(description = "Return the lineage graph (nodes and edges) at field or table level.")]
    async fn lineage_graph(
        &self,
        params: Parameters<GraphRequest>,
    ) -> Result<Json<GraphResponse>, String> {
        let engine = self.engine.clone();
        let req = params.0;
        spawn_blocking(move || engine.graph(req))
            .await
            .map(Json)
            .map_err(|e| format!("task join error: {e}"))
    }

    #[tool(
        description = "Collect every edge upstream or downstream of a field (node + anchor)."
    )]
    async fn impact(&self, params: Parameters<ImpactRequest>) -> Result<Json<ImpactResponse>, String> {
        let engine = self.engine.clone();
        let req = params.0;
        spawn_blocking(move || engine.impact(req))
            .await
            .map_err(|e| format!("task join error: {e}"))?
            .map(Json)
            .map_err(|e| e.to_string())
    }
}

#[tool_handler]
impl ServerHandler for LineageMcpServer {
    fn get_info(&self) -> ServerInfo {
        ServerInfo {
            instructions: Some(
                "Explore field-level data lineage: fetch the graph and compute impact sets."
                    .into(),
            ),
            capabilities: ServerCapabilities::builder().enable_tools().build(),
            ..Default::default()
        }
    }
}
