//! In-memory controller for tests

use std::collections::{BTreeMap, HashMap};
use std::sync::Mutex;

use async_trait::async_trait;

use crate::client::{ClientError, ClientResult, ControllerClient};
use crate::translator::{ZonedSubnet, ha_gateway_name};
use crate::wire::{
    EnableTransitHa, GatewayDetail, GatewayRecord, GatewayRef, GatewayTarget,
    LaunchTransitGateway, TagRequest, TagTarget,
};

/// A recorded facade call
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Call {
    Launch(LaunchTransitGateway),
    EnableHa(EnableTransitHa),
    Resize { gw_name: String, gw_size: String },
    Delete { gw_name: String },
    GetGateway { gw_name: String },
    GetDetail { gw_name: String },
    AddTags(TagRequest),
    DeleteTags(TagRequest),
    GetTags { resource_name: String },
    AttachHybrid { gw_name: String },
    DetachHybrid { gw_name: String },
    EnableConnectedTransit { gw_name: String },
    DisableConnectedTransit { gw_name: String },
    EnableSnat { gw_name: String },
    DisableSnat { gw_name: String },
    EnableFireNet { gw_name: String },
    DisableFireNet { gw_name: String },
}

impl Call {
    /// Short name used for failure injection
    pub fn name(&self) -> &'static str {
        match self {
            Call::Launch(_) => "launch",
            Call::EnableHa(_) => "enable_ha",
            Call::Resize { .. } => "resize",
            Call::Delete { .. } => "delete",
            Call::GetGateway { .. } => "get_gateway",
            Call::GetDetail { .. } => "get_detail",
            Call::AddTags(_) => "add_tags",
            Call::DeleteTags(_) => "delete_tags",
            Call::GetTags { .. } => "get_tags",
            Call::AttachHybrid { .. } => "attach_hybrid",
            Call::DetachHybrid { .. } => "detach_hybrid",
            Call::EnableConnectedTransit { .. } => "enable_connected_transit",
            Call::DisableConnectedTransit { .. } => "disable_connected_transit",
            Call::EnableSnat { .. } => "enable_snat",
            Call::DisableSnat { .. } => "disable_snat",
            Call::EnableFireNet { .. } => "enable_firenet",
            Call::DisableFireNet { .. } => "disable_firenet",
        }
    }

    fn is_lookup(&self) -> bool {
        matches!(
            self,
            Call::GetGateway { .. } | Call::GetDetail { .. } | Call::GetTags { .. }
        )
    }
}

#[derive(Default)]
struct Inner {
    gateways: BTreeMap<String, GatewayRecord>,
    details: HashMap<String, GatewayDetail>,
    tags: HashMap<String, Vec<String>>,
    calls: Vec<Call>,
    failures: HashMap<&'static str, ClientError>,
    next_ip: u8,
}

impl Inner {
    fn allocate_ip(&mut self) -> String {
        self.next_ip += 1;
        format!("54.0.0.{}", self.next_ip)
    }

    fn gateway_mut(&mut self, gw_name: &str) -> ClientResult<&mut GatewayRecord> {
        self.gateways.get_mut(gw_name).ok_or(ClientError::NotFound)
    }
}

/// Controller double that keeps gateways, tags and feature flags in memory
#[derive(Default)]
pub struct FakeController {
    inner: Mutex<Inner>,
}

impl FakeController {
    pub fn new() -> Self {
        Self::default()
    }

    /// Make every call named `call` fail with `error`
    pub fn fail_on(&self, call: &'static str, error: ClientError) {
        self.inner.lock().unwrap().failures.insert(call, error);
    }

    pub fn seed_gateway(&self, record: GatewayRecord) {
        let mut inner = self.inner.lock().unwrap();
        inner.gateways.insert(record.gw_name.clone(), record);
    }

    pub fn seed_tags(&self, gw_name: &str, tags: &[&str]) {
        self.inner
            .lock()
            .unwrap()
            .tags
            .insert(gw_name.to_string(), tags.iter().map(|t| t.to_string()).collect());
    }

    pub fn remove_gateway(&self, gw_name: &str) {
        self.inner.lock().unwrap().gateways.remove(gw_name);
    }

    pub fn gateway(&self, gw_name: &str) -> Option<GatewayRecord> {
        self.inner.lock().unwrap().gateways.get(gw_name).cloned()
    }

    pub fn tags(&self, gw_name: &str) -> Vec<String> {
        self.inner
            .lock()
            .unwrap()
            .tags
            .get(gw_name)
            .cloned()
            .unwrap_or_default()
    }

    pub fn calls(&self) -> Vec<Call> {
        self.inner.lock().unwrap().calls.clone()
    }

    /// Recorded calls that change controller state
    pub fn mutations(&self) -> Vec<Call> {
        self.calls().into_iter().filter(|c| !c.is_lookup()).collect()
    }

    pub fn count(&self, name: &str) -> usize {
        self.calls().iter().filter(|c| c.name() == name).count()
    }

    pub fn clear_calls(&self) {
        self.inner.lock().unwrap().calls.clear();
    }

    /// Record `call`, fail if requested, otherwise apply `f` to the state
    fn handle<T>(
        &self,
        call: Call,
        f: impl FnOnce(&mut Inner) -> ClientResult<T>,
    ) -> ClientResult<T> {
        let mut inner = self.inner.lock().unwrap();
        let name = call.name();
        inner.calls.push(call);
        if let Some(error) = inner.failures.get(name) {
            return Err(error.clone());
        }
        f(&mut inner)
    }

    fn set_flag(
        &self,
        call: Call,
        gw_name: &str,
        f: impl FnOnce(&mut GatewayRecord),
    ) -> ClientResult<()> {
        self.handle(call, |inner| {
            f(inner.gateway_mut(gw_name)?);
            Ok(())
        })
    }
}

fn yes_no(flag: bool) -> String {
    let value = if flag { "yes" } else { "no" };
    value.to_string()
}

#[async_trait]
impl ControllerClient for FakeController {
    async fn launch_transit_gateway(&self, request: &LaunchTransitGateway) -> ClientResult<()> {
        self.handle(Call::Launch(request.clone()), |inner| {
            if inner.gateways.contains_key(&request.gw_name) {
                return Err(ClientError::Rejected(format!(
                    "gateway {} already exists",
                    request.gw_name
                )));
            }
            let subnet = ZonedSubnet::from_wire(&request.gw_subnet);
            let reuse_eip = request.reuse_eip == "on";
            let public_ip = match (&request.eip, reuse_eip) {
                (Some(eip), true) => eip.clone(),
                _ => inner.allocate_ip(),
            };
            let vpc_id = match &request.vpc_id {
                Some(vpc_id) => format!("{}~~{}-vpc", vpc_id, request.gw_name),
                None => request.vnet_and_resource_group.clone().unwrap_or_default(),
            };
            let record = GatewayRecord {
                cloud_type: request.cloud_type,
                account_name: request.account_name.clone(),
                gw_name: request.gw_name.clone(),
                vpc_id,
                vpc_net: subnet.subnet,
                vpc_region: request.vpc_reg.clone(),
                gw_size: request.gw_size.clone(),
                public_ip,
                enable_nat: request.enable_nat.clone(),
                connected_transit: request.connected_transit.clone(),
                insane_mode: yes_no(request.insane_mode == "on"),
                gateway_zone: subnet.zone.unwrap_or_default(),
                enable_hybrid_connection: false,
                allocate_new_eip: !reuse_eip,
            };
            inner.gateways.insert(record.gw_name.clone(), record);
            Ok(())
        })
    }

    async fn enable_transit_ha(&self, request: &EnableTransitHa) -> ClientResult<()> {
        self.handle(Call::EnableHa(request.clone()), |inner| {
            let primary = inner
                .gateways
                .get(&request.gw_name)
                .cloned()
                .ok_or(ClientError::NotFound)?;
            let subnet = ZonedSubnet::from_wire(&request.ha_subnet);
            let public_ip = match &request.eip {
                Some(eip) => eip.clone(),
                None => inner.allocate_ip(),
            };
            let record = GatewayRecord {
                gw_name: ha_gateway_name(&request.gw_name),
                vpc_net: subnet.subnet,
                gateway_zone: subnet.zone.unwrap_or_default(),
                public_ip,
                enable_hybrid_connection: false,
                ..primary
            };
            inner.gateways.insert(record.gw_name.clone(), record);
            Ok(())
        })
    }

    async fn resize_gateway(&self, target: &GatewayTarget, gw_size: &str) -> ClientResult<()> {
        let call = Call::Resize {
            gw_name: target.gw_name.clone(),
            gw_size: gw_size.to_string(),
        };
        self.set_flag(call, &target.gw_name, |gw| gw.gw_size = gw_size.to_string())
    }

    async fn delete_gateway(&self, target: &GatewayTarget) -> ClientResult<()> {
        let call = Call::Delete {
            gw_name: target.gw_name.clone(),
        };
        self.handle(call, |inner| {
            inner
                .gateways
                .remove(&target.gw_name)
                .ok_or(ClientError::NotFound)?;
            inner.tags.remove(&target.gw_name);
            inner.details.remove(&target.gw_name);
            Ok(())
        })
    }

    async fn get_gateway(&self, _account_name: &str, gw_name: &str) -> ClientResult<GatewayRecord> {
        let call = Call::GetGateway {
            gw_name: gw_name.to_string(),
        };
        self.handle(call, |inner| {
            inner.gateways.get(gw_name).cloned().ok_or(ClientError::NotFound)
        })
    }

    async fn get_gateway_detail(&self, gateway: &GatewayRecord) -> ClientResult<GatewayDetail> {
        let call = Call::GetDetail {
            gw_name: gateway.gw_name.clone(),
        };
        self.handle(call, |inner| {
            Ok(inner.details.get(&gateway.gw_name).cloned().unwrap_or_default())
        })
    }

    async fn add_tags(&self, request: &TagRequest) -> ClientResult<()> {
        self.handle(Call::AddTags(request.clone()), |inner| {
            let tags = inner
                .tags
                .entry(request.target.resource_name.clone())
                .or_default();
            for tag in request.tags() {
                if !tags.iter().any(|t| t == tag) {
                    tags.push(tag.to_string());
                }
            }
            Ok(())
        })
    }

    async fn delete_tags(&self, request: &TagRequest) -> ClientResult<()> {
        self.handle(Call::DeleteTags(request.clone()), |inner| {
            let removed = request.tags();
            if let Some(tags) = inner.tags.get_mut(&request.target.resource_name) {
                tags.retain(|t| !removed.contains(&t.as_str()));
            }
            Ok(())
        })
    }

    async fn get_tags(&self, target: &TagTarget) -> ClientResult<Vec<String>> {
        let call = Call::GetTags {
            resource_name: target.resource_name.clone(),
        };
        self.handle(call, |inner| {
            Ok(inner
                .tags
                .get(&target.resource_name)
                .cloned()
                .unwrap_or_default())
        })
    }

    async fn attach_hybrid(&self, gateway: &GatewayRef) -> ClientResult<()> {
        let call = Call::AttachHybrid {
            gw_name: gateway.gw_name.clone(),
        };
        self.set_flag(call, &gateway.gw_name, |gw| gw.enable_hybrid_connection = true)
    }

    async fn detach_hybrid(&self, gateway: &GatewayRef) -> ClientResult<()> {
        let call = Call::DetachHybrid {
            gw_name: gateway.gw_name.clone(),
        };
        self.set_flag(call, &gateway.gw_name, |gw| gw.enable_hybrid_connection = false)
    }

    async fn enable_connected_transit(&self, gateway: &GatewayRef) -> ClientResult<()> {
        let call = Call::EnableConnectedTransit {
            gw_name: gateway.gw_name.clone(),
        };
        self.set_flag(call, &gateway.gw_name, |gw| gw.connected_transit = yes_no(true))
    }

    async fn disable_connected_transit(&self, gateway: &GatewayRef) -> ClientResult<()> {
        let call = Call::DisableConnectedTransit {
            gw_name: gateway.gw_name.clone(),
        };
        self.set_flag(call, &gateway.gw_name, |gw| gw.connected_transit = yes_no(false))
    }

    async fn enable_snat(&self, gateway: &GatewayRef) -> ClientResult<()> {
        let call = Call::EnableSnat {
            gw_name: gateway.gw_name.clone(),
        };
        self.set_flag(call, &gateway.gw_name, |gw| gw.enable_nat = yes_no(true))
    }

    async fn disable_snat(&self, gateway: &GatewayRef) -> ClientResult<()> {
        let call = Call::DisableSnat {
            gw_name: gateway.gw_name.clone(),
        };
        self.set_flag(call, &gateway.gw_name, |gw| gw.enable_nat = yes_no(false))
    }

    async fn enable_firenet_interfaces(&self, gateway: &GatewayRef) -> ClientResult<()> {
        let call = Call::EnableFireNet {
            gw_name: gateway.gw_name.clone(),
        };
        self.handle(call, |inner| {
            inner.gateway_mut(&gateway.gw_name)?;
            inner.details.entry(gateway.gw_name.clone()).or_default().dmz_enabled = true;
            Ok(())
        })
    }

    async fn disable_firenet_interfaces(&self, gateway: &GatewayRef) -> ClientResult<()> {
        let call = Call::DisableFireNet {
            gw_name: gateway.gw_name.clone(),
        };
        self.handle(call, |inner| {
            inner.gateway_mut(&gateway.gw_name)?;
            inner.details.entry(gateway.gw_name.clone()).or_default().dmz_enabled = false;
            Ok(())
        })
    }
}
