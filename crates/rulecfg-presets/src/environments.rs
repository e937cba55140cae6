//! Runtime environments and the globals they predefine.

use rulecfg_core::{EnvironmentDef, GlobalAccess};

const ES5: &[&str] = &[
    "Array", "Boolean", "Date", "decodeURI", "decodeURIComponent", "encodeURI",
    "encodeURIComponent", "Error", "escape", "eval", "EvalError", "Function", "Infinity",
    "isFinite", "isNaN", "JSON", "Math", "NaN", "Number", "Object", "parseFloat", "parseInt",
    "RangeError", "ReferenceError", "RegExp", "String", "SyntaxError", "TypeError", "undefined",
    "unescape", "URIError",
];

const ES2015: &[&str] = &[
    "ArrayBuffer", "DataView", "Float32Array", "Float64Array", "Int16Array", "Int32Array",
    "Int8Array", "Map", "Promise", "Proxy", "Reflect", "Set", "Symbol", "Uint16Array",
    "Uint32Array", "Uint8Array", "Uint8ClampedArray", "WeakMap", "WeakSet",
];

const ES2017: &[&str] = &["Atomics", "SharedArrayBuffer"];

const ES2020: &[&str] = &["BigInt", "BigInt64Array", "BigUint64Array", "globalThis"];

const ES2021: &[&str] = &["AggregateError", "FinalizationRegistry", "WeakRef"];

const BROWSER: &[&str] = &[
    "alert", "atob", "Blob", "btoa", "cancelAnimationFrame", "clearInterval", "clearTimeout",
    "confirm", "console", "crypto", "CustomEvent", "document", "Element", "Event", "EventTarget",
    "fetch", "File", "FormData", "Headers", "history", "HTMLElement", "IntersectionObserver",
    "localStorage", "location", "MutationObserver", "navigator", "Node", "performance",
    "prompt", "queueMicrotask", "Request", "requestAnimationFrame", "ResizeObserver",
    "Response", "screen", "self", "sessionStorage", "setInterval", "setTimeout", "TextDecoder",
    "TextEncoder", "URL", "URLSearchParams", "WebSocket", "window", "Worker", "XMLHttpRequest",
];

const BROWSER_WRITABLE: &[&str] = &["name", "onerror", "onload", "onmessage", "status"];

const NODE: &[&str] = &[
    "__dirname", "__filename", "AbortController", "Buffer", "clearImmediate", "clearInterval",
    "clearTimeout", "console", "global", "module", "process", "queueMicrotask", "require",
    "setImmediate", "setInterval", "setTimeout", "structuredClone", "TextDecoder",
    "TextEncoder", "URL", "URLSearchParams",
];

const NODE_WRITABLE: &[&str] = &["exports"];

const COMMONJS: &[&str] = &["module", "require"];

const SHARED_NODE_BROWSER: &[&str] = &[
    "clearInterval", "clearTimeout", "console", "setInterval", "setTimeout", "TextDecoder",
    "TextEncoder", "URL", "URLSearchParams",
];

const WORKER: &[&str] = &[
    "caches", "clearInterval", "clearTimeout", "close", "console", "fetch", "importScripts",
    "postMessage", "self", "setInterval", "setTimeout",
];

const JEST: &[&str] = &[
    "afterAll", "afterEach", "beforeAll", "beforeEach", "describe", "expect", "fit", "it",
    "jest", "test", "xdescribe", "xit", "xtest",
];

fn es_edition(name: &str, editions: &[&[&str]]) -> EnvironmentDef {
    editions.iter().fold(EnvironmentDef::new(name), |env, globals| {
        env.globals(GlobalAccess::Readonly, globals.iter().copied())
    })
}

/// All built-in environments.
#[must_use]
pub fn environments() -> Vec<EnvironmentDef> {
    let mut envs = vec![
        EnvironmentDef::new("browser")
            .globals(GlobalAccess::Readonly, BROWSER.iter().copied())
            .globals(GlobalAccess::Writable, BROWSER_WRITABLE.iter().copied()),
        EnvironmentDef::new("node")
            .globals(GlobalAccess::Readonly, NODE.iter().copied())
            .globals(GlobalAccess::Writable, NODE_WRITABLE.iter().copied()),
        EnvironmentDef::new("commonjs")
            .globals(GlobalAccess::Readonly, COMMONJS.iter().copied())
            .globals(GlobalAccess::Writable, ["exports"]),
        EnvironmentDef::new("shared-node-browser")
            .globals(GlobalAccess::Readonly, SHARED_NODE_BROWSER.iter().copied()),
        EnvironmentDef::new("worker").globals(GlobalAccess::Readonly, WORKER.iter().copied()),
        EnvironmentDef::new("jest").globals(GlobalAccess::Readonly, JEST.iter().copied()),
        es_edition("es5", &[ES5]),
        es_edition("es6", &[ES5, ES2015]),
        es_edition("es2015", &[ES5, ES2015]),
        es_edition("es2016", &[ES5, ES2015]),
        es_edition("es2017", &[ES5, ES2015, ES2017]),
        es_edition("es2018", &[ES5, ES2015, ES2017]),
        es_edition("es2019", &[ES5, ES2015, ES2017]),
        es_edition("es2020", &[ES5, ES2015, ES2017, ES2020]),
        es_edition("es2021", &[ES5, ES2015, ES2017, ES2020, ES2021]),
        es_edition("es2022", &[ES5, ES2015, ES2017, ES2020, ES2021]),
    ];
    envs.sort_by(|a, b| a.name.cmp(&b.name));
    envs
}

#[cfg(test)]
mod tests {
    use super::*;

    fn find(name: &str) -> EnvironmentDef {
        environments().into_iter().find(|e| e.name == name).unwrap()
    }

    #[test]
    fn editions_are_cumulative() {
        let es2017 = find("es2017");
        assert!(es2017.globals.contains_key("Promise"));
        assert!(es2017.globals.contains_key("SharedArrayBuffer"));
        assert!(!es2017.globals.contains_key("BigInt"));
        assert!(find("es2021").globals.contains_key("BigInt"));
    }

    #[test]
    fn node_exports_is_writable() {
        let node = find("node");
        assert_eq!(node.globals["exports"], GlobalAccess::Writable);
        assert_eq!(node.globals["process"], GlobalAccess::Readonly);
    }

    #[test]
    fn names_are_unique() {
        let envs = environments();
        let mut names: Vec<&str> = envs.iter().map(|e| e.name.as_str()).collect();
        names.dedup();
        assert_eq!(names.len(), envs.len());
    }
}
