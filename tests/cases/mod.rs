// Copyright (c) Microsoft Corporation.
// Licensed under the MIT License.

#![cfg(test)]

use anyhow::{bail, Result};
use prop_ops::*;
use serde::Deserialize;
use test_generator::test_resources;

// Process test value specified in yaml to interpret special encodings.
fn process_value(v: &Value) -> Result<Value> {
    match v {
        // Handle Undefined (array holes, absent roots) encoded as a string "#undefined"
        Value::String(s) if &**s == "#undefined" => Ok(Value::Undefined),

        // Recursively process arrays
        Value::Array(items) => {
            let mut array_value = Value::new_array();
            let array = array_value.as_array_mut()?;
            for item in items.iter() {
                array.push(process_value(item)?);
            }
            Ok(array_value)
        }

        // Recursively process objects
        Value::Object(fields) => {
            let mut object_value = Value::new_object();
            let object = object_value.as_object_mut()?;
            for (key, value) in fields.iter() {
                object.insert(key.clone(), process_value(value)?);
            }
            Ok(object_value)
        }

        // Simple variants
        _ => Ok(v.clone()),
    }
}

fn display_values(c: &Value, e: &Value) -> Result<String> {
    Ok(format!(
        "\nleft  = {}\nright = {}\n",
        serde_json::to_string_pretty(c)?,
        serde_json::to_string_pretty(e)?
    ))
}

fn match_values(computed: &Value, expected: &Value) -> Result<()> {
    if computed != expected {
        bail!("value mismatch: {}", display_values(computed, expected)?);
    }
    Ok(())
}

#[derive(Deserialize, Debug)]
struct TestCase {
    note: String,
    op: String,
    data: Option<Value>,
    path: Value,
    value: Option<Value>,
    fallback: Option<Value>,
    loose: Option<bool>,
    want_result: Option<Value>,
    error: Option<String>,
    skip: Option<bool>,
}

#[derive(Deserialize, Debug)]
struct YamlTest {
    cases: Vec<TestCase>,
}

fn run_op(case: &TestCase, data: &mut Value, value: Value) -> Result<Value> {
    let path = &case.path;
    let loose = case.loose.unwrap_or(false);

    Ok(match case.op.as_str() {
        "get" => match &case.fallback {
            Some(fallback) => get_or(data, path, process_value(fallback)?)?,
            None => get(data, path)?,
        },
        "has" => Value::from(has(data, path)?),
        "set" => set(data, path, value, loose)?,
        "set_mut" => {
            set_mut(data, path, value, loose)?;
            data.clone()
        }
        "merge" => merge(data, path, value, loose)?,
        "merge_mut" => {
            merge_mut(data, path, value, loose)?;
            data.clone()
        }
        "del" => del(data, path)?,
        "del_mut" => {
            del_mut(data, path)?;
            data.clone()
        }
        op => bail!("unknown op `{op}`"),
    })
}

fn yaml_test_impl(file: &str) -> Result<()> {
    let _ = env_logger::builder().is_test(true).try_init();

    let yaml_str = std::fs::read_to_string(file)?;
    let test: YamlTest = serde_yaml::from_str(&yaml_str)?;

    println!("running {file}");

    for case in test.cases {
        print!("case {} ", case.note);
        if case.skip == Some(true) {
            println!("skipped");
            continue;
        }

        match (&case.want_result, &case.error) {
            (Some(_), None) | (None, Some(_)) => (),
            _ => panic!("either want_result or error must be specified in test case."),
        }

        let raw = case.data.clone().unwrap_or(Value::Undefined);
        let mut data = process_value(&raw)?;
        // Built separately so that it shares nothing with `data`.
        let pristine = process_value(&raw)?;
        let value = match &case.value {
            Some(v) => process_value(v)?,
            None => Value::Undefined,
        };
        let in_place = case.op.ends_with("_mut");

        match (run_op(&case, &mut data, value), &case.want_result, &case.error) {
            (Ok(result), Some(want_result), _) => {
                match_values(&result, &process_value(want_result)?)?;
                if !in_place {
                    match_values(&data, &pristine)?;
                }
            }
            (Ok(result), None, _) => bail!("operation succeeded with {result} instead of failing"),
            (Err(actual), _, Some(expected)) => {
                let actual = actual.to_string();
                if !actual.contains(expected.as_str()) {
                    bail!(
                        "Error message\n`{}\n`\ndoes not contain `{}`",
                        actual,
                        expected
                    );
                }
                // failures never leave partial updates behind
                match_values(&data, &pristine)?;
                println!("{actual}");
            }
            (Err(actual), _, None) => return Err(actual),
        }

        println!("passed");
    }

    Ok(())
}

fn yaml_test(file: &str) -> Result<()> {
    match yaml_test_impl(file) {
        Ok(_) => Ok(()),
        Err(e) => {
            // If Err is returned, it doesn't always get printed by cargo test.
            // Therefore, panic with the error.
            panic!("{e}");
        }
    }
}

#[test_resources("tests/cases/*.yaml")]
fn run(path: &str) {
    yaml_test(path).unwrap()
}
