//! Sample log streams shared by the end-to-end tests.

pub mod fixtures {
    /// One line of each supported format, in detector order, then free text.
    pub const MIXED_STREAM: &[&str] = &[
        r#"{"level":"info","msg":"server started","port":8080}"#,
        "2024-01-02T03:04:05.123Z\tINFO\tmanager.controller\tReconciling\t{\"name\":\"web\"}",
        r#"I0102 03:04:05.000000 1 kubelet.go:7] "Pod ready" pod=web-0"#,
        r#"ts=2024-01-02T03:04:06Z level=warn msg="disk low" free=10"#,
        "ERROR connection refused",
    ];

    /// MongoDB structured log lines with callers of varying width.
    pub const MONGODB_STREAM: &[&str] = &[
        r#"{"t":{"$date":"2020-05-20T19:18:40.604+00:00"},"s":"I","c":"NETWORK","id":23285,"ctx":"main","msg":"Waiting for connections","attr":{"port":27017}}"#,
        r#"{"t":{"$date":"2020-05-20T19:18:41.000+00:00"},"s":"W","c":"-","id":4,"ctx":"conn12","msg":"Slow query","attr":{"durationMillis":250}}"#,
        r#"{"t":{"$date":"2020-05-20T19:18:42.000+00:00"},"s":"E","c":"STORAGE","id":22430,"ctx":"WTCheckpointThread","msg":"WiredTiger error"}"#,
    ];

    /// A pretty-printed JSON object split over several lines.
    pub const MULTI_LINE_JSON: &[&str] = &[
        "{",
        r#"  "level": "error","#,
        r#"  "msg": "request failed","#,
        r#"  "stack": ["main.handler", "net/http.serve"]"#,
        "}",
    ];

    /// A plain-text exception with indented continuation lines.
    pub const TRACEBACK: &[&str] = &[
        "2024-01-02 03:04:05 ERROR [worker] job crashed",
        "  at Worker.run(Worker.java:10)",
        "  at Thread.run(Thread.java:750)",
        "2024-01-02 03:04:06 INFO [worker] job restarted",
    ];

    /// Lines prefixed by a container runtime timestamp.
    pub const RUNTIME_PREFIXED: &[&str] = &[
        r#"2024-06-01T10:00:00.5Z {"level":"info","msg":"inside","time":"2000-01-01T00:00:00Z"}"#,
        "2024-06-01T10:00:01Z WARN no inner timestamp",
        "still no timestamp anywhere",
    ];
}
