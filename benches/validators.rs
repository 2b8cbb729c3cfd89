//! Benchmarks for response validation throughput per protocol.

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};
use gatecheck::protocol::{Protocol, Scenario};
use gatecheck::validate::Expectation;
use serde_json::json;

fn tool_response(protocol: Protocol) -> String {
    let body = match protocol {
        Protocol::OpenAI => json!({
            "choices": [{"message": {"role": "assistant", "content": null, "tool_calls": [
                {"id": "call_1", "type": "function", "function": {"name": "get_weather", "arguments": "{\"loc\":\"NYC\"}"}}
            ]}}]
        }),
        Protocol::Claude => json!({
            "content": [{"type": "tool_use", "id": "toolu_1", "name": "get_weather", "input": {"loc": "NYC"}}]
        }),
        Protocol::Gemini => json!({
            "candidates": [{"content": {"parts": [{"functionCall": {"name": "get_weather", "args": {"loc": "NYC"}}}]}}]
        }),
        Protocol::Ollama => json!({
            "message": {"role": "assistant", "content": "", "tool_calls": [
                {"function": {"name": "get_weather", "arguments": {"loc": "NYC"}}}
            ]}
        }),
    };
    body.to_string()
}

fn bench_tool_validation(c: &mut Criterion) {
    let mut group = c.benchmark_group("validate_tool_call");
    for protocol in Protocol::ALL {
        let body = tool_response(protocol);
        group.bench_with_input(BenchmarkId::from_parameter(protocol), &body, |b, body| {
            b.iter(|| protocol.validate_chat(200, black_box(body), Expectation::ToolCall));
        });
    }
    group.finish();
}

fn bench_protocol_mismatch(c: &mut Criterion) {
    let body = tool_response(Protocol::OpenAI);
    c.bench_function("validate_protocol_mismatch", |b| {
        b.iter(|| Protocol::Gemini.validate_chat(200, black_box(&body), Expectation::ToolCall));
    });
}

fn bench_request_building(c: &mut Criterion) {
    c.bench_function("build_all_tool_requests", |b| {
        b.iter(|| {
            for protocol in Protocol::ALL {
                let request = protocol.build_chat_request(black_box("claude-haiku-4.5"), Scenario::ToolUse);
                black_box(request.to_body().ok());
            }
        });
    });
}

criterion_group!(
    benches,
    bench_tool_validation,
    bench_protocol_mismatch,
    bench_request_building
);
criterion_main!(benches);
