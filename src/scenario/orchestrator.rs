use std::fmt;
use std::sync::Arc;

use tracing::debug;
use tracing::error;
use tracing::info;

use crate::client::Connector;
use crate::client::Coordinator;
use crate::client::Identifier;
use crate::client::Record;
use crate::client::RoutingPolicy;
use crate::cluster::ClusterControl;
use crate::cluster::ClusterMember;
use crate::config::Settings;
use crate::metrics::SCENARIO_FAILURES;
use crate::naming::NameGenerator;
use crate::scenario::expected_records;
use crate::scenario::generate;
use crate::scenario::provision;
use crate::scenario::KeyspaceSpec;
use crate::scenario::LifecycleDriver;
use crate::scenario::Pass;
use crate::scenario::ReadVerifier;
use crate::scenario::WriteDistributor;
use crate::scenario::VERIFY_CONSISTENCY;
use crate::ProvisioningError;
use crate::ScenarioError;

/// Phases the scenario moves through, strictly in declaration order
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Phase {
    Provisioning,
    Populating,
    VerifyingPass1,
    TransitioningLifecycle,
    VerifyingPass2,
}

impl Phase {
    pub fn as_str(&self) -> &'static str {
        match self {
            Phase::Provisioning => "provisioning",
            Phase::Populating => "populating",
            Phase::VerifyingPass1 => "verifying_pass1",
            Phase::TransitioningLifecycle => "transitioning_lifecycle",
            Phase::VerifyingPass2 => "verifying_pass2",
        }
    }

    /// Phase that follows a successful `self`; `None` after the second pass
    pub fn next(&self) -> Option<Phase> {
        match self {
            Phase::Provisioning => Some(Phase::Populating),
            Phase::Populating => Some(Phase::VerifyingPass1),
            Phase::VerifyingPass1 => Some(Phase::TransitioningLifecycle),
            Phase::TransitioningLifecycle => Some(Phase::VerifyingPass2),
            Phase::VerifyingPass2 => None,
        }
    }
}

impl fmt::Display for Phase {
    fn fmt(
        &self,
        f: &mut fmt::Formatter<'_>,
    ) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ScenarioState {
    Running(Phase),
    Done,
    /// Terminal; records the phase that failed
    Failed(Phase),
}

impl ScenarioState {
    pub fn is_terminal(&self) -> bool {
        !matches!(self, ScenarioState::Running(_))
    }
}

impl fmt::Display for ScenarioState {
    fn fmt(
        &self,
        f: &mut fmt::Formatter<'_>,
    ) -> fmt::Result {
        match self {
            ScenarioState::Running(phase) => write!(f, "{phase}"),
            ScenarioState::Done => f.write_str("done"),
            ScenarioState::Failed(phase) => write!(f, "failed during {phase}"),
        }
    }
}

/// Outcome of one scenario run
#[derive(Debug)]
pub struct ScenarioReport {
    pub state: ScenarioState,
    /// Keyspaces generated so far; empty when provisioning failed early
    pub matrix: Vec<KeyspaceSpec>,
    /// Human-readable log of the matrix covered and each pass outcome
    pub transcript: Vec<String>,
    pub failure: Option<ScenarioError>,
}

impl ScenarioReport {
    pub fn passed(&self) -> bool {
        self.state == ScenarioState::Done
    }

    pub fn into_result(mut self) -> std::result::Result<Self, ScenarioError> {
        match self.failure.take() {
            Some(e) => Err(e),
            None => Ok(self),
        }
    }
}

/// Coordinators and members resolved while provisioning
struct Coordinators {
    /// Ring-participating member: even-key writes and the second pass
    ring: Arc<dyn Coordinator>,
    /// Zero-token member: DDL, odd-key writes and the first pass
    zero_token: Arc<dyn Coordinator>,
    zero_token_member: ClusterMember,
}

pub struct Scenario {
    settings: Settings,
    control: Arc<dyn ClusterControl>,
    connector: Arc<dyn Connector>,
    names: Arc<dyn NameGenerator>,

    state: ScenarioState,
    matrix: Vec<KeyspaceSpec>,
    transcript: Vec<String>,
}

impl Scenario {
    pub fn new(
        settings: Settings,
        control: Arc<dyn ClusterControl>,
        connector: Arc<dyn Connector>,
        names: Arc<dyn NameGenerator>,
    ) -> Self {
        Self {
            settings,
            control,
            connector,
            names,
            state: ScenarioState::Running(Phase::Provisioning),
            matrix: Vec::new(),
            transcript: Vec::new(),
        }
    }

    /// Runs every phase once, stopping at the first error
    pub async fn run(mut self) -> ScenarioReport {
        info!("scenario starting");
        let failure = match self.execute().await {
            Ok(()) => {
                self.state = ScenarioState::Done;
                self.record(format!(
                    "PASSED: {} keyspaces verified before and after stopping the zero-token member",
                    self.matrix.len()
                ));
                None
            }
            Err(e) => {
                let phase = self.current_phase();
                self.state = ScenarioState::Failed(phase);
                SCENARIO_FAILURES.with_label_values(&[phase.as_str()]).inc();
                error!("scenario failed during {}: {}", phase, e);
                self.record(format!("FAILED during {phase}: {e}"));
                Some(e)
            }
        };

        ScenarioReport {
            state: self.state,
            matrix: self.matrix,
            transcript: self.transcript,
            failure,
        }
    }

    async fn execute(&mut self) -> std::result::Result<(), ScenarioError> {
        // Nothing joins the cluster until the settings are valid
        self.settings
            .validate()
            .map_err(|e| ScenarioError::InvalidSettings(e.to_string()))?;
        let table = Identifier::new(self.settings.scenario.table_name.as_str()).map_err(|source| ScenarioError::Ddl {
            keyspace: self.settings.scenario.table_name.clone(),
            source,
        })?;
        let timeouts = self.settings.timeouts;
        let population = self.settings.scenario.population_size;

        // Provisioning
        let coordinators = self.provision_cluster().await?;
        self.matrix = generate(self.names.as_ref(), self.settings.scenario.replication_factor)?;
        provision(
            coordinators.zero_token.as_ref(),
            &self.matrix,
            &table,
            timeouts.request(),
        )
        .await?;
        for spec in &self.matrix {
            self.transcript.push(format!("created keyspace {spec}"));
        }
        self.advance();

        // Populating
        let writer = WriteDistributor::new(
            coordinators.ring.clone(),
            coordinators.zero_token.clone(),
            self.settings.scenario.write_consistency,
            timeouts.request(),
        );
        for i in 0..self.matrix.len() {
            let spec = &self.matrix[i];
            let summary = writer.populate(spec, &table, population).await?;
            let line = format!(
                "{}: wrote {} rows ({} even via ring member, {} odd via zero-token member)",
                spec.name,
                summary.total(),
                summary.via_even,
                summary.via_odd
            );
            self.record(line);
        }
        self.advance();

        let expected = expected_records(population);

        // VerifyingPass1: every keyspace must pass before the transition
        let verifier = ReadVerifier::new(coordinators.zero_token.clone(), timeouts.request());
        self.verify_all(&verifier, &table, &expected, Pass::First).await?;
        self.advance();

        // TransitioningLifecycle
        let driver = LifecycleDriver::new(self.control.clone(), timeouts.stop_member());
        driver.stop(&coordinators.zero_token_member).await?;
        self.record(format!("stopped {}", coordinators.zero_token_member));
        self.advance();

        // VerifyingPass2
        let verifier = ReadVerifier::new(coordinators.ring.clone(), timeouts.request());
        self.verify_all(&verifier, &table, &expected, Pass::Second).await?;

        Ok(())
    }

    /// Adds the configured members and opens one pinned session to a ring
    /// member and one to a zero-token member
    async fn provision_cluster(&mut self) -> std::result::Result<Coordinators, ScenarioError> {
        let timeout = self.settings.timeouts.add_member();
        let mut members = Vec::with_capacity(self.settings.topology.members.len());

        for member_config in &self.settings.topology.members {
            let placement = self.settings.topology.placement_of(member_config);
            let joined = tokio::time::timeout(timeout, self.control.add_member(placement, member_config.join_ring))
                .await
                .map_err(|_| ProvisioningError::Timeout {
                    operation: "add_member",
                    duration: timeout,
                })
                .and_then(|r| r)
                .map_err(ScenarioError::Provisioning)?;
            members.push(joined);
        }
        for member in &members {
            self.record(format!("provisioned {member}"));
        }

        let ring_member = members
            .iter()
            .find(|m| m.participates_in_ring)
            .cloned()
            .ok_or(ScenarioError::NoCoordinator("ring-participating"))?;
        let zero_token_member = members
            .iter()
            .find(|m| m.is_zero_token())
            .cloned()
            .ok_or(ScenarioError::NoCoordinator("zero-token"))?;

        let ring = self.connect(&ring_member).await?;
        let zero_token = self.connect(&zero_token_member).await?;

        Ok(Coordinators {
            ring,
            zero_token,
            zero_token_member,
        })
    }

    async fn connect(
        &self,
        member: &ClusterMember,
    ) -> std::result::Result<Arc<dyn Coordinator>, ScenarioError> {
        debug!("connecting to {}", member);
        self.connector
            .connect(member.address, RoutingPolicy::pinned(member.address))
            .await
            .map_err(|source| ScenarioError::Connect {
                address: member.address,
                source,
            })
    }

    async fn verify_all(
        &mut self,
        verifier: &ReadVerifier,
        table: &Identifier,
        expected: &[Record],
        pass: Pass,
    ) -> std::result::Result<(), ScenarioError> {
        for i in 0..self.matrix.len() {
            let spec = &self.matrix[i];
            let result = verifier.verify(spec, table, expected, pass).await?;
            let line = format!(
                "{spec}: pass {pass} OK, {} rows at CL={} via {}",
                result.records().len(),
                VERIFY_CONSISTENCY,
                verifier.coordinator().address()
            );
            self.record(line);
        }
        Ok(())
    }

    fn current_phase(&self) -> Phase {
        match self.state {
            ScenarioState::Running(phase) | ScenarioState::Failed(phase) => phase,
            ScenarioState::Done => Phase::VerifyingPass2,
        }
    }

    fn advance(&mut self) {
        if let ScenarioState::Running(phase) = self.state {
            if let Some(next) = phase.next() {
                info!("scenario: {} -> {}", phase, next);
                self.state = ScenarioState::Running(next);
            }
        }
    }

    fn record(
        &mut self,
        line: String,
    ) {
        debug!("{}", line);
        self.transcript.push(line);
    }
}

/// Runs the zero-token verification scenario once against the given collaborators
pub async fn run_scenario(
    settings: Settings,
    control: Arc<dyn ClusterControl>,
    connector: Arc<dyn Connector>,
    names: Arc<dyn NameGenerator>,
) -> ScenarioReport {
    Scenario::new(settings, control, connector, names).run().await
}
