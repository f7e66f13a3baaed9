mod common;

use common::{config_with, cursor_after, cursor_after_last};
use eloquery::resolve_model_at;

// ─── Typed Closure Parameters ───────────────────────────────────────────────

#[test]
fn test_resolves_typed_closure_parameter() {
    let source = concat!(
        "<?php\n",
        "use App\\User;\n",
        "\n",
        "Route::get('/', function (User $user) {\n",
        "    $user->where('')\n",
        "});\n",
    );
    let cursor = cursor_after(source, "where('");

    let class = resolve_model_at(source, cursor, &config_with(&["where"]));

    assert_eq!(
        class.as_deref(),
        Some("App\\User"),
        "dependency-injected parameter type should win"
    );
}

#[test]
fn test_resolves_nullable_parameter_type() {
    let source = concat!(
        "<?php\n",
        "use App\\User;\n",
        "\n",
        "$handler = function (?User $user) {\n",
        "    $user->where('')\n",
        "};\n",
    );
    let cursor = cursor_after(source, "where('");

    let class = resolve_model_at(source, cursor, &config_with(&["where"]));

    assert_eq!(class.as_deref(), Some("App\\User"));
}

#[test]
fn test_closest_enclosing_scope_wins_between_sibling_closures() {
    let source = concat!(
        "<?php\n",
        "use App\\User;\n",
        "use App\\Post;\n",
        "\n",
        "$first = function (Post $query) {\n",
        "    $query->where('status');\n",
        "};\n",
        "$second = function (User $query) {\n",
        "    $query->where('')\n",
        "};\n",
    );
    let cursor = cursor_after_last(source, "where('");

    let class = resolve_model_at(source, cursor, &config_with(&["where"]));

    assert_eq!(
        class.as_deref(),
        Some("App\\User"),
        "the sibling closure's Post binding must stay invisible"
    );
}

#[test]
fn test_inner_parameter_shadows_outer_assignment() {
    let source = concat!(
        "<?php\n",
        "use App\\User;\n",
        "use App\\Post;\n",
        "\n",
        "$query = Post::query();\n",
        "\n",
        "$handler = function (User $query) {\n",
        "    $query->where('')\n",
        "};\n",
    );
    let cursor = cursor_after(source, "where('");

    let class = resolve_model_at(source, cursor, &config_with(&["where"]));

    assert_eq!(
        class.as_deref(),
        Some("App\\User"),
        "an inner binding must not fall through to the outer assignment"
    );
}

// ─── Closure-Parameter Proxying ─────────────────────────────────────────────

#[test]
fn test_resolves_untyped_parameter_through_outer_chain() {
    let source = concat!(
        "<?php\n",
        "use App\\User;\n",
        "\n",
        "Route::get('/', function (User $user) {\n",
        "    $user->when(true, function ($query) {\n",
        "        $query->where($example, '')\n",
        "            ->where('')\n",
        "    });\n",
        "});\n",
    );
    let cursor = cursor_after_last(source, "where('");

    let class = resolve_model_at(source, cursor, &config_with(&["where"]));

    assert_eq!(
        class.as_deref(),
        Some("App\\User"),
        "the closure parameter proxies the builder `when` runs on"
    );
}

#[test]
fn test_proxying_survives_static_calls_in_earlier_arguments() {
    let source = concat!(
        "<?php\n",
        "use App\\User;\n",
        "\n",
        "Route::get('/', function (User $user) {\n",
        "    $user->when(Arr::get($data, 'example'), function ($query) {\n",
        "        $query->where($example, '')\n",
        "            ->where('')\n",
        "    });\n",
        "});\n",
    );
    let cursor = cursor_after_last(source, "where('");

    let class = resolve_model_at(source, cursor, &config_with(&["where"]));

    assert_eq!(
        class.as_deref(),
        Some("App\\User"),
        "balanced calls in earlier arguments must not derail the walk out of the closure"
    );
}

#[test]
fn test_resolves_closure_attached_to_static_chain() {
    let source = concat!(
        "<?php\n",
        "use App\\User;\n",
        "use App\\Post;\n",
        "\n",
        "$query = Post::query();\n",
        "\n",
        "$query = User::query()\n",
        "    ->when($this->term, function ($query) {\n",
        "        $query->where('');\n",
        "    })\n",
    );
    let cursor = cursor_after(source, "where('");

    let class = resolve_model_at(source, cursor, &config_with(&["where"]));

    assert_eq!(
        class.as_deref(),
        Some("App\\User"),
        "the chain being built, not the earlier Post assignment, owns the closure"
    );
}

#[test]
fn test_resolves_second_of_multiple_closures() {
    let source = concat!(
        "<?php\n",
        "use App\\User;\n",
        "use App\\Post;\n",
        "\n",
        "$query = Post::query();\n",
        "\n",
        "$query = User::query()\n",
        "    ->when($this->term, function ($query) {\n",
        "        $query->where('name', 'John');\n",
        "    })\n",
        "    ->when($this->term, function ($query) {\n",
        "        $query->where('');\n",
        "    })\n",
    );
    let cursor = cursor_after_last(source, "where('");

    let class = resolve_model_at(source, cursor, &config_with(&["where"]));

    assert_eq!(class.as_deref(), Some("App\\User"));
}

#[test]
fn test_resolves_the_model_the_cursor_chain_belongs_to() {
    let source = concat!(
        "<?php\n",
        "use App\\User;\n",
        "use App\\Post;\n",
        "\n",
        "Route::get('/', function (User $user, Post $post) {\n",
        "    $user->where('name', 'name')->where('email', 'email')->get();\n",
        "\n",
        "    $post->where('')\n",
        "});\n",
    );
    let cursor = cursor_after_last(source, "where('");

    let class = resolve_model_at(source, cursor, &config_with(&["where"]));

    assert_eq!(
        class.as_deref(),
        Some("App\\Post"),
        "sibling chains in the same scope must stay isolated"
    );
}

// ─── Capture Clauses ────────────────────────────────────────────────────────

#[test]
fn test_captured_variable_resolves_in_outer_scope() {
    let source = concat!(
        "<?php\n",
        "use App\\User;\n",
        "\n",
        "$builder = User::query();\n",
        "\n",
        "$callback = function () use ($builder) {\n",
        "    $builder->where('')\n",
        "};\n",
    );
    let cursor = cursor_after(source, "where('");

    let class = resolve_model_at(source, cursor, &config_with(&["where"]));

    assert_eq!(class.as_deref(), Some("App\\User"));
}

#[test]
fn test_uncaptured_variable_does_not_leak_in() {
    let source = concat!(
        "<?php\n",
        "use App\\User;\n",
        "\n",
        "$builder = User::query();\n",
        "\n",
        "$callback = function () use ($other) {\n",
        "    $builder->where('')\n",
        "};\n",
    );
    let cursor = cursor_after(source, "where('");

    let class = resolve_model_at(source, cursor, &config_with(&["where"]));

    assert!(
        class.is_none(),
        "a capture clause that omits the variable leaves it unbound, got: {:?}",
        class
    );
}

// ─── Arrow Functions ────────────────────────────────────────────────────────

#[test]
fn test_resolves_typed_arrow_function_parameter() {
    let source = concat!(
        "<?php\n",
        "use App\\User;\n",
        "\n",
        "$handler = fn (User $user) => $user->where('');\n",
    );
    let cursor = cursor_after(source, "where('");

    let class = resolve_model_at(source, cursor, &config_with(&["where"]));

    assert_eq!(class.as_deref(), Some("App\\User"));
}

#[test]
fn test_resolves_untyped_arrow_function_parameter_through_chain() {
    let source = concat!(
        "<?php\n",
        "use App\\User;\n",
        "\n",
        "User::query()->when(true, fn ($query) => $query->where(''));\n",
    );
    let cursor = cursor_after(source, "where('");

    let class = resolve_model_at(source, cursor, &config_with(&["where"]));

    assert_eq!(class.as_deref(), Some("App\\User"));
}
