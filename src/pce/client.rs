//! Illumio PCE REST API v2 client.

use super::controller::PolicyController;
use super::wire::{
    exact_matches, range_records, ChangeSubset, CreateIpListRequest, HrefRef, IpListRecord,
    ProvisionRequest, ProvisionResponse, UpdateIpListRequest,
};
use crate::config::PceConfig;
use crate::error::SyncError;
use crate::json;
use crate::models::{Href, IpList, ProvisioningOutcome, RangeCollection};
use colored::Colorize;
use reqwest::{Client, RequestBuilder};
use std::collections::HashSet;

/// Authenticated connection to one PCE organization.
pub struct PceClient {
    client: Client,
    base_url: String,
    org_id: u32,
    api_key: String,
    api_secret: String,
    /// Sent again with every update so the list keeps the configured description.
    description: String,
}

impl PceClient {
    pub fn new(config: &PceConfig, description: &str) -> Result<PceClient, SyncError> {
        if !config.verify_tls {
            log::warn!("{} SSL verification disabled", "Warning:".on_red());
        }
        let client = Client::builder()
            .timeout(config.timeout)
            .danger_accept_invalid_certs(!config.verify_tls)
            .user_agent(format!(
                "{}/{}",
                env!("CARGO_PKG_NAME"),
                env!("CARGO_PKG_VERSION")
            ))
            .build()
            .map_err(|e| SyncError::Config(format!("Failed to create PCE HTTP client: {e}")))?;
        log::info!(
            "Using Illumio PCE at {} (Org ID: {})",
            config.base_url(),
            config.org_id
        );
        Ok(PceClient {
            client,
            base_url: config.base_url(),
            org_id: config.org_id,
            api_key: config.api_key.clone(),
            api_secret: config.api_secret.clone(),
            description: description.to_string(),
        })
    }

    /// URL of an org-scoped collection, e.g. `/sec_policy/draft/ip_lists`.
    fn org_url(&self, path: &str) -> String {
        format!("{}/orgs/{}{}", self.base_url, self.org_id, path)
    }

    /// URL of a resource href, which the PCE returns relative to `/api/v2`.
    fn href_url(&self, href: &Href) -> String {
        format!("{}{}", self.base_url, href.as_str())
    }

    /// Send an authenticated request; returns the body of a 2xx response.
    async fn send(&self, request: RequestBuilder, what: &str) -> Result<String, String> {
        let response = request
            .basic_auth(&self.api_key, Some(&self.api_secret))
            .header(reqwest::header::ACCEPT, "application/json")
            .send()
            .await
            .map_err(|e| format!("{what}: {e}"))?;
        let status = response.status();
        let body = response
            .text()
            .await
            .map_err(|e| format!("{what}: reading body: {e}"))?;
        log::debug!("{what} -> {status} ({} bytes)", body.len());
        if status.is_success() {
            Ok(body)
        } else {
            log::warn!("{} {what} returned {status}", "failed".on_red());
            Err(format!("{what} returned {status}: {}", json::truncate(&body)))
        }
    }

    async fn get_ip_list(&self, href: &Href) -> Result<IpList, String> {
        let what = format!("GET {href}");
        let body = self.send(self.client.get(self.href_url(href)), &what).await?;
        let record: IpListRecord = json::decode(&body, "ip_list")?;
        record.into_model().map_err(|e| e.to_string())
    }
}

impl PolicyController for PceClient {
    async fn find_by_name(&self, name: &str) -> Result<Vec<IpList>, SyncError> {
        log::info!("Searching for existing IPList: {name}...");
        let request = self
            .client
            .get(self.org_url("/sec_policy/draft/ip_lists"))
            .query(&[("name", name)]);
        let body = self
            .send(request, "GET ip_lists")
            .await
            .map_err(SyncError::Fetch)?;
        let records: Vec<IpListRecord> =
            json::decode(&body, "ip_lists").map_err(SyncError::Fetch)?;
        exact_matches(records, name)
    }

    async fn create(
        &self,
        name: &str,
        ranges: &RangeCollection,
        description: &str,
    ) -> Result<IpList, SyncError> {
        log::info!("IPList not found. Creating new IPList: {name}...");
        let body = CreateIpListRequest {
            name,
            description,
            ip_ranges: range_records(ranges),
        };
        let request = self
            .client
            .post(self.org_url("/sec_policy/draft/ip_lists"))
            .json(&body);
        let response = self
            .send(request, "POST ip_lists")
            .await
            .map_err(SyncError::Write)?;
        let record: IpListRecord =
            json::decode(&response, "created ip_list").map_err(SyncError::Write)?;
        let created = record.into_model()?;
        log::info!("Successfully created IPList: {created}");
        Ok(created)
    }

    async fn update(&self, href: &Href, ranges: &RangeCollection) -> Result<IpList, SyncError> {
        log::info!("Updating IPList {href} with {} ranges...", ranges.len());
        let body = UpdateIpListRequest {
            description: &self.description,
            ip_ranges: range_records(ranges),
        };
        let what = format!("PUT {href}");
        let request = self.client.put(self.href_url(href)).json(&body);
        self.send(request, &what).await.map_err(SyncError::Write)?;

        // PUT answers 204 without a body; read back the current state
        let updated = self.get_ip_list(href).await.map_err(SyncError::Write)?;
        if updated.href != *href {
            return Err(SyncError::Write(format!(
                "PCE returned {} when reading back {href}",
                updated.href
            )));
        }
        log::info!("Successfully updated IPList: {updated}");
        Ok(updated)
    }

    async fn provision(&self, hrefs: &HashSet<Href>) -> Result<ProvisioningOutcome, SyncError> {
        let mut sorted: Vec<&str> = hrefs.iter().map(Href::as_str).collect();
        sorted.sort_unstable();
        log::info!("Provisioning policy changes for IPList: {}...", sorted.join(", "));

        let body = ProvisionRequest {
            update_description: format!(
                "Provision Zscaler IPList: {} ({})",
                sorted.join(", "),
                chrono::Utc::now().format("%Y-%m-%d %H:%M:%S UTC")
            ),
            change_subset: ChangeSubset {
                ip_lists: sorted.iter().map(|href| HrefRef { href: *href }).collect(),
            },
        };
        let request = self.client.post(self.org_url("/sec_policy")).json(&body);
        let response = self
            .send(request, "POST sec_policy")
            .await
            .map_err(SyncError::Provision)?;
        let parsed: ProvisionResponse =
            json::decode(&response, "provision response").map_err(SyncError::Provision)?;
        let outcome = ProvisioningOutcome::from(parsed);
        log::info!(
            "Successfully provisioned policy changes: version={} workloads_affected={}",
            outcome.version,
            outcome.workloads_affected
        );
        Ok(outcome)
    }
}
