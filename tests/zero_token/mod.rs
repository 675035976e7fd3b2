mod fault_injection_case;
mod placement_case;
mod reference_scenario_case;
