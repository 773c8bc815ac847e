use super::*;
use crate::http::Method;

#[test]
fn step_scenario_cycles_through_steps() -> Result<(), String> {
    let factory = StepScenario::new(vec![
        RequestSpec::get("/"),
        RequestSpec::new("login", Method::POST, "/login").with_body("{\"user\":\"a\"}"),
    ])
    .map_err(|err| err.to_string())?;
    let mut scenario = factory.build(7);

    let labels: Vec<String> = (0..5)
        .filter_map(|_| scenario.next_request())
        .map(|request| request.label.to_string())
        .collect();
    if labels == ["/", "login", "/", "login", "/"] {
        Ok(())
    } else {
        Err(format!("Unexpected step order: {:?}", labels))
    }
}

#[test]
fn each_user_gets_its_own_cursor() -> Result<(), String> {
    let factory = StepScenario::new(vec![RequestSpec::get("/a"), RequestSpec::get("/b")])
        .map_err(|err| err.to_string())?;
    let mut first = factory.build(1);
    let mut second = factory.build(2);

    let _advance = first.next_request();
    let next_first = first.next_request().map(|request| request.path);
    let next_second = second.next_request().map(|request| request.path);
    if next_first.as_deref() == Some("/b") && next_second.as_deref() == Some("/a") {
        Ok(())
    } else {
        Err(format!("Cursors shared state: {:?} {:?}", next_first, next_second))
    }
}

#[test]
fn empty_step_list_is_rejected() -> Result<(), String> {
    match StepScenario::new(Vec::new()) {
        Err(crate::error::ValidationError::EmptyScenario) => Ok(()),
        Err(err) => Err(format!("Unexpected error: {}", err)),
        Ok(_) => Err("empty scenario accepted".to_owned()),
    }
}

#[test]
fn closures_act_as_factories() -> Result<(), String> {
    struct Once(bool);
    impl Scenario for Once {
        fn next_request(&mut self) -> Option<RequestSpec> {
            if self.0 {
                None
            } else {
                self.0 = true;
                Some(RequestSpec::get("/once"))
            }
        }
    }

    let factory = |_user: u64| -> Box<dyn Scenario> { Box::new(Once(false)) };
    let mut scenario = ScenarioFactory::build(&factory, 1);
    let first = scenario.next_request();
    let second = scenario.next_request();
    if first.is_some() && second.is_none() {
        Ok(())
    } else {
        Err("closure factory did not build the scenario".to_owned())
    }
}
