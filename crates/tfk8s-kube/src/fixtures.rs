//! CRD documents shared by unit tests

pub const CERTIFICATE_CRD: &str = r#"
apiVersion: apiextensions.k8s.io/v1
kind: CustomResourceDefinition
metadata:
  name: certificates.cert-manager.io
spec:
  group: cert-manager.io
  scope: Namespaced
  names:
    kind: Certificate
    plural: certificates
    singular: certificate
  versions:
    - name: v1
      served: true
      storage: true
      schema:
        openAPIV3Schema:
          description: A Certificate resource should be created to ensure an up to date and signed X.509 certificate is stored in the Kubernetes Secret resource named in spec.secretName.
          type: object
          required:
            - spec
          properties:
            apiVersion:
              type: string
            kind:
              type: string
            metadata:
              type: object
            spec:
              type: object
              required:
                - secretName
                - issuerRef
              properties:
                secretName:
                  type: string
                  description: Name of the Secret resource that will be automatically created and managed by this Certificate resource.
                issuerRef:
                  type: object
                  required:
                    - name
                  properties:
                    name:
                      type: string
                    kind:
                      type: string
                duration:
                  type: string
                  pattern: "^[0-9]+(h|m|s)$"
                renewTime:
                  type: string
                  format: date-time
                caBundle:
                  type: string
                  format: byte
                dnsNames:
                  type: array
                  items:
                    type: string
                secretLabels:
                  type: object
                  additionalProperties:
                    type: string
                revisionHistoryLimit:
                  type: integer
                  format: int32
                metricsPort:
                  type: integer
                targetPort:
                  x-kubernetes-int-or-string: true
                  pattern: "^[a-z0-9-]+$"
                extra:
                  type: object
                  x-kubernetes-preserve-unknown-fields: true
                ports:
                  type: array
                  items:
                    type: object
                    properties:
                      port:
                        type: integer
                      name:
                        type: string
            status:
              type: object
              properties:
                notAfter:
                  type: string
                  format: date-time
    - name: v1alpha1
      served: false
      storage: false
"#;

pub const CLUSTER_ISSUER_CRD: &str = r#"
apiVersion: apiextensions.k8s.io/v1
kind: CustomResourceDefinition
metadata:
  name: clusterissuers.cert-manager.io
spec:
  group: cert-manager.io
  scope: Cluster
  names:
    kind: ClusterIssuer
    plural: clusterissuers
  versions:
    - name: v1
      served: true
      storage: true
      schema:
        openAPIV3Schema:
          type: object
          properties:
            spec:
              type: object
              properties:
                acme:
                  type: object
                  properties:
                    email:
                      type: string
"#;
