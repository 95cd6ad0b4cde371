//! Integration tests for error types and classification

use launchcore_errors::*;

#[test]
fn test_error_conversion() {
    let net_err = NetworkError::Timeout {
        url: "https://example.com".into(),
    };
    let err: Error = net_err.into();
    assert!(matches!(err, Error::Network(_)));
}

#[test]
fn test_error_display() {
    let err = ProcessError::Crashed { code: 1 };
    assert_eq!(err.to_string(), "external process exited with code 1");

    let err = NetworkError::DownloadFailed {
        url: "https://example.com/client.jar".into(),
    };
    assert_eq!(
        err.to_string(),
        "download did not complete: https://example.com/client.jar"
    );
}

#[test]
fn test_error_clone() {
    let err = AddonError::ResourceUnavailable {
        provider: "optifine".into(),
    };
    let cloned = err.clone();
    assert_eq!(err.to_string(), cloned.to_string());
}

#[test]
fn test_io_error_conversion() {
    let io_err = std::io::Error::new(std::io::ErrorKind::TimedOut, "test");
    let err: Error = io_err.into();
    assert!(matches!(
        err,
        Error::Io {
            kind: std::io::ErrorKind::TimedOut,
            ..
        }
    ));
}

#[test]
fn test_json_error_converts_to_parse() {
    let json_err = serde_json::from_str::<serde_json::Value>("not json").unwrap_err();
    let err: Error = json_err.into();
    assert!(matches!(err, Error::Parse(ParseError::Json { .. })));
}

#[test]
fn test_classify_timeout() {
    let err = Error::Network(NetworkError::Timeout {
        url: "https://example.com".into(),
    });
    assert_eq!(ClassifiedError::classify(&err), ClassifiedError::Timeout);
}

#[test]
fn test_classify_name_resolution_failure() {
    let err = Error::Network(NetworkError::HostUnresolved {
        host: "launchermeta.example.com".into(),
    });
    assert_eq!(
        ClassifiedError::classify(&err),
        ClassifiedError::NetworkUnreachable
    );
}

#[test]
fn test_classify_connection_refused() {
    let err = Error::Network(NetworkError::ConnectionRefused("refused".into()));
    assert_eq!(
        ClassifiedError::classify(&err),
        ClassifiedError::ConnectionFailed
    );
}

#[test]
fn test_classify_parse_failure() {
    let err = Error::Parse(ParseError::Manifest {
        message: "missing downloads section".into(),
    });
    assert_eq!(ClassifiedError::classify(&err), ClassifiedError::ParseFailed);
}

#[test]
fn test_classify_addon_resource_unavailable() {
    let err = Error::Addon(AddonError::ResourceUnavailable {
        provider: "optifine".into(),
    });
    assert_eq!(
        ClassifiedError::classify(&err),
        ClassifiedError::ExternalResourceUnavailable
    );
}

#[test]
fn test_classify_process_crash_carries_exit_code() {
    let err = Error::Process(ProcessError::Crashed { code: 137 });
    assert_eq!(
        ClassifiedError::classify(&err),
        ClassifiedError::ExternalProcessCrashed(137)
    );
}

#[test]
fn test_classify_download_failed() {
    let err = Error::Network(NetworkError::DownloadFailed {
        url: "https://example.com/client.jar".into(),
    });
    assert_eq!(
        ClassifiedError::classify(&err),
        ClassifiedError::DownloadFailed
    );

    let err = Error::Network(NetworkError::HttpStatus {
        status: 503,
        url: "https://example.com/client.jar".into(),
    });
    assert_eq!(
        ClassifiedError::classify(&err),
        ClassifiedError::DownloadFailed
    );
}

#[test]
fn test_classify_is_total() {
    // A representative of every aggregate variant maps to exactly one
    // category without panicking.
    let samples: Vec<Error> = vec![
        NetworkError::InvalidUrl("::".into()).into(),
        ParseError::Json {
            message: "truncated".into(),
        }
        .into(),
        AddonError::UnsupportedVersion {
            provider: "forge".into(),
            version: "0.0".into(),
        }
        .into(),
        ProcessError::SpawnFailed {
            message: "java not found".into(),
        }
        .into(),
        TrackerError::Finalized.into(),
        InstallError::AlreadyRunning.into(),
        Error::Internal("boom".into()),
        Error::Cancelled,
        std::io::Error::new(std::io::ErrorKind::NotFound, "gone").into(),
    ];

    for err in samples {
        match ClassifiedError::classify(&err) {
            ClassifiedError::Unknown(detail) => assert!(!detail.is_empty()),
            _ => {}
        }
    }
}

#[test]
fn test_user_facing_error_surface() {
    let err: Error = NetworkError::Timeout {
        url: "https://example.com".into(),
    }
    .into();
    assert!(err.is_retryable());
    assert_eq!(err.user_code(), Some("network.timeout"));
    assert!(err.user_hint().is_some());
}
