// SPDX-FileCopyrightText: 2025-2026 ocfiles contributors
//
// SPDX-License-Identifier: Apache-2.0

//! Client integration tests with wiremock.

use ocfiles_webdav::{AuthMethod, Depth, FilesClient, FilesConfig, FilesError, PropertyName};
use wiremock::matchers::{body_string_contains, header, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn client_for(server: &MockServer) -> FilesClient {
    FilesClient::new(FilesConfig {
        base_url: server.uri(),
        username: "admin".to_string(),
        auth: AuthMethod::None,
        ..Default::default()
    })
    .expect("failed to create client")
}

fn exception_body(exception: &str, message: &str) -> String {
    format!(
        "<?xml version=\"1.0\" encoding=\"utf-8\"?>\n\
         <d:error xmlns:d=\"DAV:\" xmlns:s=\"http://sabredav.org/ns\">\n\
         <s:exception>Sabre\\DAV\\Exception\\{exception}</s:exception>\n\
         <s:message>{message}</s:message>\n\
         </d:error>"
    )
}

fn child_unit(href: &str) -> String {
    format!(
        "<d:response>\n\
         <d:href>{href}</d:href>\n\
         <d:propstat>\n\
         <d:prop>\n\
         <d:getlastmodified>Mon, 19 Oct 2020 03:50:00 GMT</d:getlastmodified>\n\
         <d:getcontentlength>11</d:getcontentlength>\n\
         <d:resourcetype/>\n\
         <d:getetag>&quot;3986cd55c130a4d50ff0904bf64aa27d&quot;</d:getetag>\n\
         <d:getcontenttype>text/plain</d:getcontenttype>\n\
         </d:prop>\n\
         <d:status>HTTP/1.1 200 OK</d:status>\n\
         </d:propstat>\n\
         <d:propstat>\n\
         <d:prop>\n\
         <d:quota-used-bytes/>\n\
         </d:prop>\n\
         <d:status>HTTP/1.1 404 Not Found</d:status>\n\
         </d:propstat>\n\
         </d:response>\n"
    )
}

fn listing_body(folder_href: &str, children: &[&str]) -> String {
    let mut body = format!(
        "<?xml version=\"1.0\"?>\n\
         <d:multistatus\n\
         xmlns:d=\"DAV:\"\n\
         xmlns:s=\"http://sabredav.org/ns\"\n\
         xmlns:oc=\"http://owncloud.org/ns\">\n\
         <d:response>\n\
         <d:href>{folder_href}</d:href>\n\
         <d:propstat>\n\
         <d:prop>\n\
         <d:resourcetype>\n\
         <d:collection/>\n\
         </d:resourcetype>\n\
         <d:getetag>&quot;5f8d0ce8c62b5&quot;</d:getetag>\n\
         </d:prop>\n\
         <d:status>HTTP/1.1 200 OK</d:status>\n\
         </d:propstat>\n\
         </d:response>\n"
    );
    for child in children {
        body.push_str(&child_unit(child));
    }
    body.push_str("</d:multistatus>");
    body
}

fn single_property_body(href: &str, prop: &str, value: &str) -> String {
    format!(
        "<?xml version=\"1.0\"?>\n\
         <d:multistatus\n\
         xmlns:d=\"DAV:\"\n\
         xmlns:s=\"http://sabredav.org/ns\"\n\
         xmlns:oc=\"http://owncloud.org/ns\">\n\
         <d:response>\n\
         <d:href>{href}</d:href>\n\
         <d:propstat>\n\
         <d:prop>\n\
         <oc:{prop}>{value}</oc:{prop}>\n\
         </d:prop>\n\
         <d:status>HTTP/1.1 200 OK</d:status>\n\
         </d:propstat>\n\
         </d:response>\n\
         </d:multistatus>"
    )
}

#[tokio::test]
#[ignore = "require network"]
async fn client_list_returns_entries_in_server_order() {
    let mock_server = MockServer::start().await;

    let body = listing_body(
        "/remote.php/webdav/testFolder/",
        &[
            "/remote.php/webdav/testFolder/abc.txt",
            "/remote.php/webdav/testFolder/file%20one.txt",
            "/remote.php/webdav/testFolder/subdir",
            "/remote.php/webdav/testFolder/zz%2bz.txt",
            "/remote.php/webdav/testFolder/%e4%b8%ad%e6%96%87.txt",
        ],
    );
    Mock::given(method("PROPFIND"))
        .and(path("/remote.php/webdav/testFolder"))
        .and(header("Depth", "1"))
        .and(header("Content-Type", "application/xml; charset=utf-8"))
        .respond_with(ResponseTemplate::new(207).set_body_raw(body, "application/xml"))
        .mount(&mock_server)
        .await;

    let client = client_for(&mock_server);
    let entries = client
        .list("/testFolder", Depth::One)
        .await
        .expect("failed to list");

    assert_eq!(entries.len(), 6);
    assert_eq!(entries[0].name(), "testFolder");
    assert!(entries[0].is_dir());
    assert_eq!(entries[1].name(), "abc.txt");
    assert_eq!(entries[2].name(), "file one.txt");
    assert_eq!(entries[3].name(), "subdir");
    assert_eq!(entries[4].name(), "zz+z.txt");
    assert_eq!(entries[5].name(), "中文.txt");
    assert_eq!(entries[5].path(), "/testFolder/中文.txt");
}

#[tokio::test]
#[ignore = "require network"]
async fn client_list_missing_folder_is_not_found() {
    let mock_server = MockServer::start().await;

    Mock::given(method("PROPFIND"))
        .and(path("/remote.php/webdav/noSuchDir"))
        .respond_with(ResponseTemplate::new(404).set_body_raw(
            exception_body(
                "NotFound",
                "File with name noSuchDir could not be located",
            ),
            "application/xml",
        ))
        .mount(&mock_server)
        .await;

    let client = client_for(&mock_server);
    let err = client
        .list("/noSuchDir", Depth::One)
        .await
        .expect_err("expected NotFound");

    assert!(matches!(err, FilesError::NotFound { .. }));
    assert_eq!(
        err.to_string(),
        "File with name /noSuchDir could not be located"
    );
}

#[tokio::test]
#[ignore = "require network"]
async fn client_numeric_depth_filters_client_side() {
    let mock_server = MockServer::start().await;

    let body = listing_body(
        "/remote.php/webdav/testFolder/",
        &[
            "/remote.php/webdav/testFolder/abc.txt",
            "/remote.php/webdav/testFolder/subdir",
            "/remote.php/webdav/testFolder/subdir/in%20dir.txt",
        ],
    );
    Mock::given(method("PROPFIND"))
        .and(path("/remote.php/webdav/testFolder"))
        .and(header("Depth", "infinity"))
        .respond_with(ResponseTemplate::new(207).set_body_raw(body, "application/xml"))
        .mount(&mock_server)
        .await;

    let client = client_for(&mock_server);

    let shallow = client
        .list("/testFolder", Depth::Limit(1))
        .await
        .expect("failed to list");
    assert!(shallow.iter().all(|entry| entry.name() != "in dir.txt"));
    assert_eq!(shallow.len(), 3);

    let deep = client
        .list("/testFolder", Depth::Limit(2))
        .await
        .expect("failed to list");
    assert!(deep.iter().any(|entry| entry.name() == "in dir.txt"));
    assert_eq!(deep.len(), 4);
}

#[tokio::test]
#[ignore = "require network"]
async fn client_move_identical_source_and_destination_is_translated() {
    let mock_server = MockServer::start().await;

    let encoded = "/remote.php/webdav/testFolder/%E4%B8%AD%E6%96%87.txt";
    Mock::given(method("MOVE"))
        .and(path(encoded))
        .and(header(
            "Destination",
            format!("{}{}", mock_server.uri(), encoded).as_str(),
        ))
        .respond_with(ResponseTemplate::new(403).set_body_raw(
            exception_body("Forbidden", "Source and destination uri are identical."),
            "application/xml",
        ))
        .mount(&mock_server)
        .await;

    let client = client_for(&mock_server);
    let err = client
        .move_file("/testFolder/中文.txt", "/testFolder/中文.txt")
        .await
        .expect_err("expected Forbidden");

    assert!(matches!(err, FilesError::Forbidden { .. }));
    assert_eq!(err.to_string(), "Source and destination uri are identical.");
}

#[tokio::test]
#[ignore = "require network"]
async fn client_move_to_different_name_succeeds() {
    let mock_server = MockServer::start().await;

    Mock::given(method("MOVE"))
        .and(path("/remote.php/webdav/testFolder/%E4%B8%AD%E6%96%87.txt"))
        .and(header(
            "Destination",
            format!(
                "{}/remote.php/webdav/testFolder/%E4%B8%AD%E6%96%87123.txt",
                mock_server.uri()
            )
            .as_str(),
        ))
        .respond_with(ResponseTemplate::new(201))
        .mount(&mock_server)
        .await;

    let client = client_for(&mock_server);
    client
        .move_file("/testFolder/中文.txt", "/testFolder/中文123.txt")
        .await
        .expect("failed to move");
}

#[tokio::test]
#[ignore = "require network"]
async fn client_favorite_sends_lexical_literal_and_reads_back_verbatim() {
    let mock_server = MockServer::start().await;

    let proppatch_answer =
        single_property_body("/remote.php/webdav/testFile.txt", "favorite", "");
    Mock::given(method("PROPPATCH"))
        .and(path("/remote.php/webdav/testFile.txt"))
        .and(body_string_contains("<oc:favorite>true</oc:favorite>"))
        .respond_with(ResponseTemplate::new(207).set_body_raw(proppatch_answer, "application/xml"))
        .mount(&mock_server)
        .await;
    Mock::given(method("PROPFIND"))
        .and(path("/remote.php/webdav/testFile.txt"))
        .and(body_string_contains("<oc:favorite/>"))
        .respond_with(ResponseTemplate::new(207).set_body_raw(
            single_property_body("/remote.php/webdav/testFile.txt", "favorite", "1"),
            "application/xml",
        ))
        .mount(&mock_server)
        .await;

    let client = client_for(&mock_server);
    client
        .favorite("/testFile.txt", true)
        .await
        .expect("failed to favorite");

    let info = client
        .file_info("/testFile.txt", &[PropertyName::oc("favorite")])
        .await
        .expect("failed to fetch info");
    // The server's literal current value, no client-side interpretation.
    assert_eq!(info.favorite(), Some("1"));
}

#[tokio::test]
#[ignore = "require network"]
async fn client_tus_headers_attach_to_first_entry_only() {
    let mock_server = MockServer::start().await;

    let body = listing_body(
        "/remote.php/webdav/",
        &["/remote.php/webdav/dummy.txt"],
    );
    Mock::given(method("PROPFIND"))
        .and(path("/remote.php/webdav/"))
        .respond_with(
            ResponseTemplate::new(207)
                .set_body_raw(body, "application/xml")
                .insert_header("Tus-Resumable", "1.0.0")
                .insert_header("Tus-Version", "1.0.0,0.2.1,0.1.1")
                .insert_header("Tus-Extension", "create,create-with-upload")
                .insert_header("Tus-Max-Size", "100000000"),
        )
        .mount(&mock_server)
        .await;

    let client = client_for(&mock_server);
    let entries = client.list("/", Depth::One).await.expect("failed to list");

    let tus = entries[0].tus_support().expect("first entry capability");
    assert_eq!(tus.resumable, "1.0.0");
    assert_eq!(tus.version, vec!["1.0.0", "0.2.1", "0.1.1"]);
    assert_eq!(tus.extension, vec!["create", "create-with-upload"]);
    assert_eq!(tus.max_size, Some(100_000_000));
    assert!(entries[1].tus_support().is_none());
}

#[tokio::test]
#[ignore = "require network"]
async fn client_search_reports_against_the_files_endpoint() {
    let mock_server = MockServer::start().await;

    Mock::given(method("REPORT"))
        .and(path("/remote.php/dav/files/admin/"))
        .and(body_string_contains("<oc:pattern>abc</oc:pattern>"))
        .and(body_string_contains("<oc:limit>30</oc:limit>"))
        .respond_with(ResponseTemplate::new(207).set_body_raw(
            "<?xml version=\"1.0\"?>\n\
             <d:multistatus\n\
             xmlns:d=\"DAV:\"\n\
             xmlns:s=\"http://sabredav.org/ns\"\n\
             xmlns:oc=\"http://owncloud.org/ns\">\n\
             <d:response>\n\
             <d:href>/remote.php/dav/files/admin/testFolder/abc.txt</d:href>\n\
             <d:propstat>\n\
             <d:prop>\n\
             <oc:favorite>0</oc:favorite>\n\
             <d:getcontentlength>6</d:getcontentlength>\n\
             <oc:size>6</oc:size>\n\
             <d:getlastmodified>Wed, 21 Oct 2020 11:20:54 GMT</d:getlastmodified>\n\
             <d:resourcetype/>\n\
             </d:prop>\n\
             <d:status>HTTP/1.1 200 OK</d:status>\n\
             </d:propstat>\n\
             </d:response>\n\
             </d:multistatus>",
            "application/xml",
        ))
        .mount(&mock_server)
        .await;

    let client = client_for(&mock_server);
    let properties = [
        PropertyName::oc("favorite"),
        PropertyName::dav("getcontentlength"),
        PropertyName::oc("size"),
        PropertyName::dav("getlastmodified"),
        PropertyName::dav("resourcetype"),
    ];
    let matches = client
        .search("abc", Some(30), &properties)
        .await
        .expect("failed to search");

    assert_eq!(matches.len(), 1);
    assert_eq!(matches[0].name(), "abc.txt");
    assert_eq!(matches[0].path(), "/testFolder/abc.txt");
    assert_eq!(matches[0].size(), Some(6));
    assert!(!matches[0].is_dir());
}

#[tokio::test]
#[ignore = "require network"]
async fn client_favorite_filter_lists_flagged_files() {
    let mock_server = MockServer::start().await;

    Mock::given(method("REPORT"))
        .and(path("/remote.php/dav/files/admin/"))
        .and(body_string_contains("<oc:filter-rules>"))
        .and(body_string_contains("<oc:favorite>1</oc:favorite>"))
        .respond_with(ResponseTemplate::new(207).set_body_raw(
            single_property_body(
                "/remote.php/dav/files/admin/testFile.txt",
                "favorite",
                "1",
            ),
            "application/xml",
        ))
        .mount(&mock_server)
        .await;

    let client = client_for(&mock_server);
    let favorites = client
        .favorite_files(&[PropertyName::oc("favorite")])
        .await
        .expect("failed to filter");

    assert_eq!(favorites.len(), 1);
    assert_eq!(favorites[0].path(), "/testFile.txt");
    assert_eq!(favorites[0].favorite(), Some("1"));
}

#[tokio::test]
#[ignore = "require network"]
async fn client_tag_creation_assignment_and_filter() {
    let mock_server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/remote.php/dav/systemtags"))
        .and(header("Content-Type", "application/json"))
        .and(body_string_contains("\"name\":\"testSystemTag12345\""))
        .respond_with(
            ResponseTemplate::new(201)
                .insert_header("Content-Location", "/remote.php/dav/systemtags/6789"),
        )
        .mount(&mock_server)
        .await;
    Mock::given(method("PROPFIND"))
        .and(path("/remote.php/webdav/testFolder/testFile.txt"))
        .and(body_string_contains("<oc:fileid/>"))
        .respond_with(ResponseTemplate::new(207).set_body_raw(
            single_property_body(
                "/remote.php/webdav/testFolder/testFile.txt",
                "fileid",
                "123456789",
            ),
            "application/xml",
        ))
        .mount(&mock_server)
        .await;
    Mock::given(method("PUT"))
        .and(path("/remote.php/dav/systemtags-relations/files/123456789/6789"))
        .respond_with(ResponseTemplate::new(201))
        .mount(&mock_server)
        .await;
    Mock::given(method("REPORT"))
        .and(path("/remote.php/dav/files/admin/"))
        .and(body_string_contains("<oc:systemtag>6789</oc:systemtag>"))
        .respond_with(ResponseTemplate::new(207).set_body_raw(
            single_property_body(
                "/remote.php/dav/files/admin/testFolder/testFile.txt",
                "fileid",
                "123456789",
            ),
            "application/xml",
        ))
        .mount(&mock_server)
        .await;

    let client = client_for(&mock_server);

    let tag = client
        .create_tag("testSystemTag12345")
        .await
        .expect("failed to create tag");
    assert_eq!(tag.id, 6789);
    assert_eq!(tag.name, "testSystemTag12345");

    let info = client
        .file_info("/testFolder/testFile.txt", &[PropertyName::oc("fileid")])
        .await
        .expect("failed to fetch info");
    let file_id = info.file_id().expect("file id expected");

    client
        .tag_file(file_id, tag.id)
        .await
        .expect("failed to tag file");

    let tagged = client
        .files_by_tag(&[tag.id], &[PropertyName::oc("fileid")])
        .await
        .expect("failed to filter by tag");
    assert_eq!(tagged.len(), 1);
    assert_eq!(tagged[0].name(), "testFile.txt");
}

#[tokio::test]
#[ignore = "require network"]
async fn client_resolves_path_for_file_id() {
    let mock_server = MockServer::start().await;

    Mock::given(method("PROPFIND"))
        .and(path("/remote.php/dav/meta/123456789"))
        .and(body_string_contains("<oc:meta-path-for-user/>"))
        .respond_with(ResponseTemplate::new(207).set_body_raw(
            single_property_body(
                "/remote.php/dav/meta/123456789/",
                "meta-path-for-user",
                "/testFolder/testFile.txt",
            ),
            "application/xml",
        ))
        .mount(&mock_server)
        .await;
    Mock::given(method("PROPFIND"))
        .and(path("/remote.php/webdav/testFolder/testFile.txt"))
        .and(body_string_contains("<oc:fileid/>"))
        .respond_with(ResponseTemplate::new(207).set_body_raw(
            single_property_body(
                "/remote.php/webdav/testFolder/testFile.txt",
                "fileid",
                "123456789",
            ),
            "application/xml",
        ))
        .mount(&mock_server)
        .await;

    let client = client_for(&mock_server);
    let resolved = client
        .path_for_file_id("123456789")
        .await
        .expect("failed to resolve");

    assert_eq!(resolved, "/testFolder/testFile.txt");
}

#[tokio::test]
#[ignore = "require network"]
async fn client_mkdir_in_missing_parent_surfaces_server_message() {
    let mock_server = MockServer::start().await;

    Mock::given(method("MKCOL"))
        .and(path("/remote.php/webdav/testFolder/nope/newFolder"))
        .respond_with(ResponseTemplate::new(409).set_body_raw(
            exception_body("Conflict", "Parent node does not exist"),
            "application/xml",
        ))
        .mount(&mock_server)
        .await;

    let client = client_for(&mock_server);
    let err = client
        .mkdir("/testFolder/nope/newFolder/")
        .await
        .expect_err("expected Conflict");

    assert!(matches!(err, FilesError::Conflict { .. }));
    assert_eq!(err.to_string(), "Parent node does not exist");
}

#[tokio::test]
#[ignore = "require network"]
async fn client_put_get_delete_roundtrip() {
    let mock_server = MockServer::start().await;

    Mock::given(method("PUT"))
        .and(path("/remote.php/webdav/testFolder/testFile.txt"))
        .respond_with(ResponseTemplate::new(201))
        .mount(&mock_server)
        .await;
    Mock::given(method("GET"))
        .and(path("/remote.php/webdav/testFolder/testFile.txt"))
        .respond_with(
            ResponseTemplate::new(200)
                .insert_header("ETag", "\"abc123\"")
                .set_body_string("test content"),
        )
        .mount(&mock_server)
        .await;
    Mock::given(method("DELETE"))
        .and(path("/remote.php/webdav/testFolder/testFile.txt"))
        .respond_with(ResponseTemplate::new(204))
        .mount(&mock_server)
        .await;

    let client = client_for(&mock_server);
    client
        .put_file_contents("/testFolder/testFile.txt", b"test content".to_vec())
        .await
        .expect("failed to upload");

    let contents = client
        .get_file_contents("/testFolder/testFile.txt")
        .await
        .expect("failed to download");
    assert_eq!(contents, b"test content");

    client
        .delete("/testFolder/testFile.txt")
        .await
        .expect("failed to delete");
}

#[tokio::test]
#[ignore = "require network"]
async fn client_get_missing_file_is_not_found() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/remote.php/webdav/nonExistentFile.txt"))
        .respond_with(
            ResponseTemplate::new(404).set_body_string("<html>not a sabre body</html>"),
        )
        .mount(&mock_server)
        .await;

    let client = client_for(&mock_server);
    let err = client
        .get_file_contents("/nonExistentFile.txt")
        .await
        .expect_err("expected NotFound");

    assert_eq!(
        err.to_string(),
        "File with name /nonExistentFile.txt could not be located"
    );
}

#[tokio::test]
#[ignore = "require network"]
async fn client_exists_converts_not_found_into_false() {
    let mock_server = MockServer::start().await;

    Mock::given(method("PROPFIND"))
        .and(path("/remote.php/webdav/present.txt"))
        .respond_with(ResponseTemplate::new(207).set_body_raw(
            single_property_body("/remote.php/webdav/present.txt", "fileid", "42"),
            "application/xml",
        ))
        .mount(&mock_server)
        .await;
    Mock::given(method("PROPFIND"))
        .and(path("/remote.php/webdav/absent.txt"))
        .respond_with(ResponseTemplate::new(404).set_body_raw(
            exception_body(
                "NotFound",
                "File with name absent.txt could not be located",
            ),
            "application/xml",
        ))
        .mount(&mock_server)
        .await;

    let client = client_for(&mock_server);
    assert!(client.exists("/present.txt").await.expect("exists failed"));
    assert!(!client.exists("/absent.txt").await.expect("exists failed"));
}
